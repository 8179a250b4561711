//! Integer range sets for the constraint store
//!
//! A [`RangeSet`] is a sorted list of disjoint closed intervals. An empty
//! set means the constraint is infeasible.

use super::symbol::BinaryOp;
use crate::shared::models::CType;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RangeSet(Vec<(i128, i128)>);

impl RangeSet {
    pub fn new(lo: i128, hi: i128) -> Self {
        if lo > hi {
            RangeSet(Vec::new())
        } else {
            RangeSet(vec![(lo, hi)])
        }
    }

    pub fn empty() -> Self {
        RangeSet(Vec::new())
    }

    pub fn point(value: i128) -> Self {
        Self::new(value, value)
    }

    /// Every value representable by `ty`
    pub fn full(ty: &CType) -> Self {
        let (lo, hi) = ty.value_range();
        Self::new(lo, hi)
    }

    pub fn from_hull((lo, hi): (i128, i128)) -> Self {
        Self::new(lo, hi)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn min(&self) -> Option<i128> {
        self.0.first().map(|(lo, _)| *lo)
    }

    pub fn max(&self) -> Option<i128> {
        self.0.last().map(|(_, hi)| *hi)
    }

    pub fn hull(&self) -> Option<(i128, i128)> {
        Some((self.min()?, self.max()?))
    }

    /// The single value of a one-point set
    pub fn concrete(&self) -> Option<i128> {
        match self.0.as_slice() {
            [(lo, hi)] if lo == hi => Some(*lo),
            _ => None,
        }
    }

    pub fn contains(&self, value: i128) -> bool {
        self.0.iter().any(|(lo, hi)| *lo <= value && value <= *hi)
    }

    pub fn intersect(&self, other: &RangeSet) -> RangeSet {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            let (a_lo, a_hi) = self.0[i];
            let (b_lo, b_hi) = other.0[j];
            let lo = a_lo.max(b_lo);
            let hi = a_hi.min(b_hi);
            if lo <= hi {
                out.push((lo, hi));
            }
            if a_hi < b_hi {
                i += 1;
            } else {
                j += 1;
            }
        }
        RangeSet(out)
    }

    /// Remove a single value
    pub fn exclude(&self, value: i128) -> RangeSet {
        let mut out = Vec::with_capacity(self.0.len() + 1);
        for &(lo, hi) in &self.0 {
            if value < lo || value > hi {
                out.push((lo, hi));
                continue;
            }
            if lo < value {
                out.push((lo, value - 1));
            }
            if value < hi {
                out.push((value + 1, hi));
            }
        }
        RangeSet(out)
    }

    /// Values `v` of this set for which `v op k` holds
    pub fn restrict(&self, op: BinaryOp, k: i128) -> RangeSet {
        match op {
            BinaryOp::Lt => self.intersect(&Self::new(i128::MIN, k.saturating_sub(1))),
            BinaryOp::Le => self.intersect(&Self::new(i128::MIN, k)),
            BinaryOp::Gt => self.intersect(&Self::new(k.saturating_add(1), i128::MAX)),
            BinaryOp::Ge => self.intersect(&Self::new(k, i128::MAX)),
            BinaryOp::Eq => self.intersect(&Self::point(k)),
            BinaryOp::Ne => self.exclude(k),
            _ => self.clone(),
        }
    }
}

/// Interval hull of `a op b`
pub fn apply_hull(op: BinaryOp, a: (i128, i128), b: (i128, i128)) -> (i128, i128) {
    let (a_lo, a_hi) = a;
    let (b_lo, b_hi) = b;
    match op {
        BinaryOp::Add => (a_lo.saturating_add(b_lo), a_hi.saturating_add(b_hi)),
        BinaryOp::Sub => (a_lo.saturating_sub(b_hi), a_hi.saturating_sub(b_lo)),
        BinaryOp::Mul => {
            let products = [
                a_lo.saturating_mul(b_lo),
                a_lo.saturating_mul(b_hi),
                a_hi.saturating_mul(b_lo),
                a_hi.saturating_mul(b_hi),
            ];
            let lo = products.iter().copied().min().unwrap_or(i128::MIN);
            let hi = products.iter().copied().max().unwrap_or(i128::MAX);
            (lo, hi)
        }
        BinaryOp::Div if b_lo == b_hi && b_lo > 0 => (a_lo / b_lo, a_hi / b_lo),
        BinaryOp::Rem if b_lo == b_hi && b_lo != 0 => {
            let bound = b_lo.saturating_abs() - 1;
            let lo = if a_lo >= 0 { 0 } else { -bound };
            let hi = if a_hi <= 0 { 0 } else { bound };
            (lo, hi)
        }
        op if op.is_comparison() => match compare_hulls(op, a, b) {
            Some(true) => (1, 1),
            Some(false) => (0, 0),
            None => (0, 1),
        },
        _ => (i128::MIN, i128::MAX),
    }
}

/// Decide `a op b` for every pair of values drawn from the hulls
pub fn compare_hulls(op: BinaryOp, a: (i128, i128), b: (i128, i128)) -> Option<bool> {
    let (a_lo, a_hi) = a;
    let (b_lo, b_hi) = b;
    match op {
        BinaryOp::Lt if a_hi < b_lo => Some(true),
        BinaryOp::Lt if a_lo >= b_hi => Some(false),
        BinaryOp::Le if a_hi <= b_lo => Some(true),
        BinaryOp::Le if a_lo > b_hi => Some(false),
        BinaryOp::Gt | BinaryOp::Ge => compare_hulls(op.swap(), b, a),
        BinaryOp::Eq if a_lo == a_hi && b_lo == b_hi && a_lo == b_lo => Some(true),
        BinaryOp::Eq if a_hi < b_lo || b_hi < a_lo => Some(false),
        BinaryOp::Ne => compare_hulls(BinaryOp::Eq, a, b).map(|holds| !holds),
        _ => None,
    }
}
