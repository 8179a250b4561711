//! Symbolic value construction and folding
//!
//! The builder owns the per-run symbol counter. Folding is state-aware:
//! symbols the constraints pin to a constant are substituted before
//! combining, so `i - 1` becomes `-1` on a path where `i == 0`.

use std::sync::atomic::{AtomicU32, Ordering};

use super::program_state::ProgramState;
use crate::features::symbolic::domain::{
    BinaryOp, Loc, Region, RegionKind, SVal, SymExpr, Symbol, SymbolOrigin,
};
use crate::shared::models::CType;

#[derive(Debug)]
pub struct SValBuilder {
    next_symbol: AtomicU32,
}

impl Default for SValBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SValBuilder {
    pub fn new() -> Self {
        Self {
            next_symbol: AtomicU32::new(1),
        }
    }

    fn fresh_id(&self) -> u32 {
        self.next_symbol.fetch_add(1, Ordering::Relaxed)
    }

    pub fn conjure_symbol(&self, tag: &str, ty: CType) -> Symbol {
        Symbol::new(
            self.fresh_id(),
            ty,
            SymbolOrigin::Conjured { tag: tag.to_string() },
        )
    }

    /// Fresh value of type `ty`; pointers become symbolic regions
    pub fn conjure_sval(&self, tag: &str, ty: CType) -> SVal {
        let is_pointer = ty.is_pointer();
        let symbol = self.conjure_symbol(tag, ty);
        if is_pointer {
            SVal::region(Region::symbolic(symbol))
        } else {
            SVal::symbol(symbol)
        }
    }

    /// Checker-owned symbol describing a property of `region`
    pub fn metadata_symbol(&self, region: &Region, tag: &str, ty: CType) -> Symbol {
        Symbol::new(
            self.fresh_id(),
            ty,
            SymbolOrigin::Metadata {
                region: region.clone(),
                tag: tag.to_string(),
            },
        )
    }

    /// `lhs op rhs`
    pub fn eval_binop(&self, state: &ProgramState, op: BinaryOp, lhs: &SVal, rhs: &SVal) -> SVal {
        if lhs.is_loc() || rhs.is_loc() {
            return match op {
                BinaryOp::Eq => self.eval_eq(state, lhs, rhs),
                BinaryOp::Ne => match self.eval_eq(state, lhs, rhs) {
                    SVal::Int(v) => SVal::Int((v == 0) as i128),
                    SVal::Sym(expr) => SVal::Sym(negate_relation(expr)),
                    other => other,
                },
                _ => SVal::Unknown,
            };
        }
        Self::fold_binop(state, op, lhs, rhs)
    }

    /// Pointer identity comparison
    pub fn eval_eq(&self, state: &ProgramState, lhs: &SVal, rhs: &SVal) -> SVal {
        match (lhs, rhs) {
            (SVal::Undefined, _) | (_, SVal::Undefined) => SVal::Undefined,
            (SVal::Unknown, _) | (_, SVal::Unknown) => SVal::Unknown,
            (SVal::Loc(a), SVal::Loc(b)) => eval_loc_eq(a, b),
            (SVal::Loc(loc), other) | (other, SVal::Loc(loc)) => {
                if other.is_zero_constant() {
                    eval_loc_eq(loc, &Loc::Null)
                } else {
                    SVal::Unknown
                }
            }
            _ => Self::fold_binop(state, BinaryOp::Eq, lhs, rhs),
        }
    }

    /// `loc + offset` elements of `element_ty`
    pub fn eval_ptr_offset(
        &self,
        state: &ProgramState,
        loc: &SVal,
        offset: &SVal,
        element_ty: &CType,
    ) -> SVal {
        let Some(region) = loc.as_region() else {
            return SVal::Unknown;
        };
        if !offset.is_nonloc() {
            return SVal::Unknown;
        }
        let (parent, index) = match region.kind() {
            RegionKind::Element {
                element_ty: ty,
                index,
                parent,
            } if ty == element_ty => {
                let index = Self::fold_binop(state, BinaryOp::Add, index, offset);
                (parent.clone(), index)
            }
            _ => (region.clone(), offset.clone()),
        };
        if !index.is_nonloc() {
            return SVal::Unknown;
        }
        SVal::region(Region::element(&parent, element_ty.clone(), index))
    }

    /// Integer arithmetic with constant folding
    pub fn fold_binop(state: &ProgramState, op: BinaryOp, lhs: &SVal, rhs: &SVal) -> SVal {
        match (lhs, rhs) {
            (SVal::Undefined, _) | (_, SVal::Undefined) => return SVal::Undefined,
            (SVal::Int(_) | SVal::Sym(_), SVal::Int(_) | SVal::Sym(_)) => {}
            _ => return SVal::Unknown,
        }
        let (Some(lhs), Some(rhs)) = (substitute(state, lhs), substitute(state, rhs)) else {
            return SVal::Unknown;
        };
        match fold_expr(op, lhs, rhs) {
            Some(expr) => SVal::from_expr(expr),
            None => SVal::Unknown,
        }
    }
}

/// Expression for `value`, with pinned symbols replaced by constants
fn substitute(state: &ProgramState, value: &SVal) -> Option<SymExpr> {
    if let Some(known) = state.known_value(value) {
        return Some(SymExpr::Int(known));
    }
    value.as_expr()
}

fn fold_expr(op: BinaryOp, lhs: SymExpr, rhs: SymExpr) -> Option<SymExpr> {
    match (&lhs, &rhs) {
        (SymExpr::Int(a), SymExpr::Int(b)) => return op.eval(*a, *b).map(SymExpr::Int),
        _ if op.is_comparison() && lhs == rhs => return op.eval(0, 0).map(SymExpr::Int),
        _ => {}
    }

    // Constants go on the right of commutative arithmetic
    let swap = matches!(lhs, SymExpr::Int(_)) && matches!(op, BinaryOp::Add | BinaryOp::Mul);
    let (lhs, rhs) = if swap { (rhs, lhs) } else { (lhs, rhs) };

    match (op, rhs.as_int()) {
        (BinaryOp::Add | BinaryOp::Sub, Some(0)) | (BinaryOp::Mul | BinaryOp::Div, Some(1)) => {
            return Some(lhs)
        }
        (BinaryOp::Mul, Some(0)) => return Some(SymExpr::Int(0)),
        (BinaryOp::Div | BinaryOp::Rem, Some(0)) => return None,
        _ => {}
    }

    // (e ± c1) ± c2  =>  e ± (c1 ± c2)
    if let (BinaryOp::Add | BinaryOp::Sub, Some(c2)) = (op, rhs.as_int()) {
        if let SymExpr::Binary {
            op: inner_op @ (BinaryOp::Add | BinaryOp::Sub),
            lhs: inner,
            rhs: inner_rhs,
        } = &lhs
        {
            if let Some(c1) = inner_rhs.as_int() {
                let c1 = if *inner_op == BinaryOp::Add { c1 } else { c1.checked_neg()? };
                let c2 = if op == BinaryOp::Add { c2 } else { c2.checked_neg()? };
                let net = c1.checked_add(c2)?;
                let inner = inner.as_ref().clone();
                return Some(match net {
                    0 => inner,
                    n if n > 0 => SymExpr::binary(BinaryOp::Add, inner, SymExpr::Int(n)),
                    n => SymExpr::binary(BinaryOp::Sub, inner, SymExpr::Int(n.checked_neg()?)),
                });
            }
        }
    }

    Some(SymExpr::binary(op, lhs, rhs))
}

fn negate_relation(expr: SymExpr) -> SymExpr {
    match expr {
        SymExpr::Binary { op, lhs, rhs } if op.is_comparison() => SymExpr::Binary {
            op: op.negate(),
            lhs,
            rhs,
        },
        other => SymExpr::binary(BinaryOp::Eq, other, SymExpr::Int(0)),
    }
}

fn eval_loc_eq(a: &Loc, b: &Loc) -> SVal {
    match (a, b) {
        (Loc::Null, Loc::Null) => SVal::Int(1),
        (Loc::Label(x), Loc::Label(y)) => SVal::Int((x == y) as i128),
        (Loc::Region(region), Loc::Null) | (Loc::Null, Loc::Region(region)) => {
            match region.kind() {
                RegionKind::Symbolic { symbol } => SVal::Sym(SymExpr::binary(
                    BinaryOp::Eq,
                    SymExpr::Atom(symbol.clone()),
                    SymExpr::Int(0),
                )),
                _ => SVal::Int(0),
            }
        }
        (Loc::Region(x), Loc::Region(y)) => {
            let (x, y) = (x.strip_casts(), y.strip_casts());
            if x == y {
                SVal::Int(1)
            } else if x.symbolic_base().is_none() && y.symbolic_base().is_none() {
                SVal::Int(0)
            } else {
                SVal::Unknown
            }
        }
        _ => SVal::Int(0),
    }
}
