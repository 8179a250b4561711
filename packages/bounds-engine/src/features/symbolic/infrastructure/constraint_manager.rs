//! Range-based constraint store
//!
//! Constraints are kept as a [`RangeSet`] per symbolic expression.
//! Relations against a constant are normalized onto the innermost
//! non-additive expression, so `(len + 1) <= 8` constrains `len`.
//! Relations between two symbolic expressions are recorded as a fact on
//! the relation itself and also tighten both sides.

use tracing::trace;

use super::program_state::ProgramState;
use super::sval_builder::SValBuilder;
use crate::features::symbolic::domain::range_set::{apply_hull, compare_hulls};
use crate::features::symbolic::domain::{BinaryOp, Loc, RangeSet, RegionKind, SVal, SymExpr};

impl ProgramState {
    /// Possible values of `expr` on this path
    pub fn range_of(&self, expr: &SymExpr) -> RangeSet {
        let computed = match expr {
            SymExpr::Int(value) => RangeSet::point(*value),
            SymExpr::Atom(symbol) => RangeSet::full(symbol.ty()),
            SymExpr::Binary { op, lhs, rhs } => {
                match (self.range_of(lhs).hull(), self.range_of(rhs).hull()) {
                    (Some(l), Some(r)) => RangeSet::from_hull(apply_hull(*op, l, r)),
                    _ => RangeSet::empty(),
                }
            }
        };
        match self.constraints.get(expr) {
            Some(stored) => stored.intersect(&computed),
            None => computed,
        }
    }

    /// Concrete value of `value` if the constraints pin it down
    pub fn known_value(&self, value: &SVal) -> Option<i128> {
        match value {
            SVal::Int(v) => Some(*v),
            SVal::Sym(expr) => self.range_of(expr).concrete(),
            SVal::Loc(Loc::Null) => Some(0),
            _ => None,
        }
    }

    /// State in which `cond` evaluates to `assumption`, if feasible.
    ///
    /// Unknown and undefined conditions never prune.
    pub fn assume(&self, cond: &SVal, assumption: bool) -> Option<ProgramState> {
        match cond {
            SVal::Undefined | SVal::Unknown => Some(self.clone()),
            SVal::Int(value) => ((*value != 0) == assumption).then(|| self.clone()),
            SVal::Loc(loc) => self.assume_loc(loc, assumption),
            SVal::Sym(expr) => self.assume_expr(expr, assumption),
        }
    }

    /// `(cond holds, cond fails)`; either or both may be `None`
    pub fn assume_dual(&self, cond: &SVal) -> (Option<ProgramState>, Option<ProgramState>) {
        (self.assume(cond, true), self.assume(cond, false))
    }

    /// Assume `0 <= idx < count` (or its negation)
    pub fn assume_in_bound(
        &self,
        idx: &SVal,
        count: &SVal,
        assumption: bool,
    ) -> Option<ProgramState> {
        if !idx.is_nonloc() || !count.is_nonloc() {
            return Some(self.clone());
        }
        let non_negative = SValBuilder::fold_binop(self, BinaryOp::Ge, idx, &SVal::Int(0));
        let below_count = SValBuilder::fold_binop(self, BinaryOp::Lt, idx, count);
        if assumption {
            return self
                .assume(&non_negative, true)?
                .assume(&below_count, true);
        }
        self.assume(&non_negative, false)
            .or_else(|| self.assume(&below_count, false))
    }

    fn assume_loc(&self, loc: &Loc, non_null: bool) -> Option<ProgramState> {
        match loc {
            Loc::Null => (!non_null).then(|| self.clone()),
            Loc::Label(_) => non_null.then(|| self.clone()),
            Loc::Region(region) => match region.kind() {
                RegionKind::Symbolic { symbol } => {
                    let op = if non_null { BinaryOp::Ne } else { BinaryOp::Eq };
                    self.assume_sym_int(&SymExpr::Atom(symbol.clone()), op, 0)
                }
                // Storage at an offset from an opaque pointer, or named storage
                _ => non_null.then(|| self.clone()),
            },
        }
    }

    fn assume_expr(&self, expr: &SymExpr, assumption: bool) -> Option<ProgramState> {
        if let SymExpr::Binary { op, lhs, rhs } = expr {
            if op.is_comparison() {
                let op = if assumption { *op } else { op.negate() };
                return self.assume_relation(lhs, op, rhs);
            }
        }
        let op = if assumption { BinaryOp::Ne } else { BinaryOp::Eq };
        self.assume_sym_int(expr, op, 0)
    }

    fn assume_relation(&self, lhs: &SymExpr, op: BinaryOp, rhs: &SymExpr) -> Option<ProgramState> {
        match (lhs, rhs) {
            (_, SymExpr::Int(k)) => self.assume_sym_int(lhs, op, *k),
            (SymExpr::Int(k), _) => self.assume_sym_int(rhs, op.swap(), *k),
            _ => self.assume_sym_sym(lhs, op, rhs),
        }
    }

    /// `expr op k`
    pub(super) fn assume_sym_int(&self, expr: &SymExpr, op: BinaryOp, k: i128) -> Option<ProgramState> {
        let (mut expr, mut k) = (expr, k);
        while let Some((inner, delta)) = peel_additive(expr) {
            expr = inner;
            k = k.checked_sub(delta)?;
        }

        let current = self.range_of(expr);
        let restricted = current.restrict(op, k);
        trace!("assume {} {} {}: {:?} -> {:?}", expr, op.symbol(), k, current, restricted);
        if restricted.is_empty() {
            return None;
        }
        if restricted == current {
            return Some(self.clone());
        }
        Some(self.with_constraint(expr.clone(), restricted))
    }

    fn assume_sym_sym(&self, lhs: &SymExpr, op: BinaryOp, rhs: &SymExpr) -> Option<ProgramState> {
        if lhs == rhs {
            return op.eval(0, 0).filter(|holds| *holds == 1).map(|_| self.clone());
        }
        let l = self.range_of(lhs).hull()?;
        let r = self.range_of(rhs).hull()?;
        match compare_hulls(op, l, r) {
            Some(true) => return Some(self.clone()),
            Some(false) => return None,
            None => {}
        }
        if let Some(holds) = self.recorded_relation(lhs, op, rhs) {
            return holds.then(|| self.clone());
        }

        let relation = SymExpr::binary(op, lhs.clone(), rhs.clone());
        let mut next = self.with_constraint(relation, RangeSet::point(1));
        // Tighten both sides against the other's bounds
        let (l_lo, l_hi) = l;
        let (r_lo, r_hi) = r;
        next = match op {
            BinaryOp::Lt => next
                .assume_sym_int(lhs, BinaryOp::Lt, r_hi)?
                .assume_sym_int(rhs, BinaryOp::Gt, l_lo)?,
            BinaryOp::Le => next
                .assume_sym_int(lhs, BinaryOp::Le, r_hi)?
                .assume_sym_int(rhs, BinaryOp::Ge, l_lo)?,
            BinaryOp::Gt => next
                .assume_sym_int(lhs, BinaryOp::Gt, r_lo)?
                .assume_sym_int(rhs, BinaryOp::Lt, l_hi)?,
            BinaryOp::Ge => next
                .assume_sym_int(lhs, BinaryOp::Ge, r_lo)?
                .assume_sym_int(rhs, BinaryOp::Le, l_hi)?,
            BinaryOp::Eq => next
                .assume_sym_int(lhs, BinaryOp::Ge, r_lo)?
                .assume_sym_int(lhs, BinaryOp::Le, r_hi)?
                .assume_sym_int(rhs, BinaryOp::Ge, l_lo)?
                .assume_sym_int(rhs, BinaryOp::Le, l_hi)?,
            _ => next,
        };
        Some(next)
    }

    /// Truth of `lhs op rhs` from previously recorded relations
    fn recorded_relation(&self, lhs: &SymExpr, op: BinaryOp, rhs: &SymExpr) -> Option<bool> {
        let holds = |l: &SymExpr, op: BinaryOp, r: &SymExpr| {
            let key = SymExpr::binary(op, l.clone(), r.clone());
            self.constraints
                .get(&key)
                .and_then(|range| range.concrete())
                .map(|value| value != 0)
        };
        holds(lhs, op, rhs)
            .or_else(|| holds(lhs, op.negate(), rhs).map(|v| !v))
            .or_else(|| holds(rhs, op.swap(), lhs))
            .or_else(|| holds(rhs, op.swap().negate(), lhs).map(|v| !v))
    }

    fn with_constraint(&self, expr: SymExpr, range: RangeSet) -> ProgramState {
        let mut next = self.clone();
        next.constraints.insert(expr, range);
        next
    }
}

/// `e + c` / `c + e` / `e - c` as `(e, ±c)`
fn peel_additive(expr: &SymExpr) -> Option<(&SymExpr, i128)> {
    match expr {
        SymExpr::Binary {
            op: BinaryOp::Add,
            lhs,
            rhs,
        } => match (lhs.as_ref(), rhs.as_ref()) {
            (inner, SymExpr::Int(c)) | (SymExpr::Int(c), inner) => Some((inner, *c)),
            _ => None,
        },
        SymExpr::Binary {
            op: BinaryOp::Sub,
            lhs,
            rhs,
        } => match rhs.as_ref() {
            SymExpr::Int(c) => Some((lhs.as_ref(), c.checked_neg()?)),
            _ => None,
        },
        _ => None,
    }
}
