//! Offset/extent simplification
//!
//! Rewrites `offset < extent` into an equivalent comparison on a simpler
//! offset so the range store can decide it: `(e * c) < n` becomes
//! `e < n / c` when `c` divides `n`, and additive constants move across.
//! Best-effort: anything else is returned unchanged. Offsets are assumed
//! not to overflow.

use crate::features::symbolic::{BinaryOp, SVal, SymExpr};

pub fn simplify_offsets(offset: SVal, extent: i128) -> (SVal, i128) {
    match offset {
        SVal::Sym(expr) => {
            let (expr, extent) = simplify_expr(expr, extent);
            (SVal::from_expr(expr), extent)
        }
        other => (other, extent),
    }
}

fn simplify_expr(expr: SymExpr, extent: i128) -> (SymExpr, i128) {
    let SymExpr::Binary { op, lhs, rhs } = &expr else {
        return (expr, extent);
    };
    let Some(c) = rhs.as_int() else {
        return (expr, extent);
    };
    if lhs.as_int().is_some() {
        return (expr, extent);
    }
    let reduced = match op {
        BinaryOp::Mul if c > 0 && extent % c == 0 => Some(extent / c),
        BinaryOp::Add => extent.checked_sub(c),
        BinaryOp::Sub => extent.checked_add(c),
        _ => None,
    };
    match reduced {
        Some(extent) => simplify_expr(lhs.as_ref().clone(), extent),
        None => (expr, extent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::symbolic::SValBuilder;
    use crate::shared::models::CType;

    #[test]
    fn test_scaled_index_is_unscaled() {
        let svals = SValBuilder::new();
        let i = svals.conjure_symbol("i", CType::Int);
        let scaled = SymExpr::binary(
            BinaryOp::Mul,
            SymExpr::binary(BinaryOp::Sub, SymExpr::Atom(i.clone()), SymExpr::Int(1)),
            SymExpr::Int(4),
        );
        let (offset, extent) = simplify_offsets(SVal::Sym(scaled), 0);
        assert_eq!(offset, SVal::symbol(i));
        assert_eq!(extent, 1);
    }

    #[test]
    fn test_non_dividing_factor_is_kept() {
        let svals = SValBuilder::new();
        let i = SymExpr::Atom(svals.conjure_symbol("i", CType::Int));
        let scaled = SymExpr::binary(BinaryOp::Mul, i, SymExpr::Int(4));
        let (offset, extent) = simplify_offsets(SVal::Sym(scaled.clone()), 2);
        assert_eq!(offset, SVal::Sym(scaled));
        assert_eq!(extent, 2);
    }

    #[test]
    fn test_concrete_offsets_pass_through() {
        assert_eq!(simplify_offsets(SVal::Int(-8), 0), (SVal::Int(-8), 0));
    }
}
