//! `strcmp`, `strncmp`, `strcasecmp`, `strncasecmp`, `strcoll`

use std::cmp::Ordering;

use tracing::trace;

use super::cstring_checker::CStringBoundsChecker;
use crate::features::checker_api::{CallEvent, CheckerContext};
use crate::features::cstring_bounds::infrastructure::compare_literals;
use crate::features::function_effects::StringModel;
use crate::features::symbolic::{BinaryOp, SVal, SValBuilder};

/// Bytes of the literal `value` points to
fn literal_of(value: &SVal) -> Option<Vec<u8>> {
    value
        .as_region()
        .map(|region| region.strip_casts())
        .and_then(|region| region.literal_bytes().map(<[u8]>::to_vec))
}

impl CStringBoundsChecker {
    pub(super) fn eval_strcmp(
        &self,
        call: &CallEvent,
        model: &StringModel,
        ignore_case: bool,
        ctx: &mut CheckerContext<'_>,
    ) {
        let description = model.family.description();
        let (Some(lhs), Some(rhs)) = (call.arg(0), call.arg(1)) else {
            return;
        };
        let svals = ctx.svals();

        let state = ctx.state().clone();
        let Some(state) = self.check_non_null(ctx, &state, call, 0, description) else {
            return;
        };
        let Some(state) = self.check_non_null(ctx, &state, call, 1, description) else {
            return;
        };
        let (state, lhs_len) = self.c_string_length(ctx, state, &lhs.value, description, call.span);
        if lhs_len.is_undef() {
            return;
        }
        let (state, rhs_len) = self.c_string_length(ctx, state, &rhs.value, description, call.span);
        if rhs_len.is_undef() {
            return;
        }

        // Comparing a buffer with itself
        let same = svals.eval_eq(&state, &lhs.value, &rhs.value);
        let (same_state, state) = state.assume_dual(&same);
        if let Some(same_state) = same_state {
            trace!("cstring: {} compares a buffer with itself", call.callee);
            ctx.add_transition(same_state.bind_expr(call.expr, SVal::Int(0)));
        }
        let Some(state) = state else {
            return;
        };

        if let (Some(lhs_bytes), Some(rhs_bytes)) = (literal_of(&lhs.value), literal_of(&rhs.value)) {
            // A bound only helps when its value is known
            let limit = match model.bound.and_then(|idx| call.arg(idx)) {
                None => Some(None),
                Some(bound) => state
                    .known_value(&bound.value)
                    .and_then(|n| usize::try_from(n).ok())
                    .map(Some),
            };
            if let Some(limit) = limit {
                let ordering = compare_literals(&lhs_bytes, &rhs_bytes, limit, ignore_case);
                trace!("cstring: {} on literals is {:?}", call.callee, ordering);
                let op = match ordering {
                    Ordering::Equal => {
                        ctx.add_transition(state.bind_expr(call.expr, SVal::Int(0)));
                        return;
                    }
                    Ordering::Greater => BinaryOp::Gt,
                    Ordering::Less => BinaryOp::Lt,
                };
                let result = svals.conjure_sval(&call.callee, call.return_ty.clone());
                let sign = SValBuilder::fold_binop(&state, op, &result, &SVal::Int(0));
                if let Some(state) = state.assume(&sign, true) {
                    ctx.add_transition(state.bind_expr(call.expr, result));
                }
                return;
            }
        }

        let result = svals.conjure_sval(&call.callee, call.return_ty.clone());
        ctx.add_transition(state.bind_expr(call.expr, result));
    }
}
