//! `strlen`, `strnlen`

use tracing::trace;

use super::cstring_checker::CStringBoundsChecker;
use crate::features::checker_api::{CallEvent, CheckerContext};
use crate::features::function_effects::StringModel;
use crate::features::symbolic::{BinaryOp, SVal, SValBuilder};

impl CStringBoundsChecker {
    pub(super) fn eval_strlen(&self, call: &CallEvent, model: &StringModel, ctx: &mut CheckerContext<'_>) {
        let description = model.family.description();
        let Some(string) = call.arg(0) else {
            return;
        };
        let mut state = ctx.state().clone();

        // strnlen(s, 0) reads nothing
        let maxlen = model.bound.and_then(|idx| call.arg(idx)).map(|arg| arg.value.clone());
        if let Some(maxlen) = &maxlen {
            let is_zero = SValBuilder::fold_binop(&state, BinaryOp::Eq, maxlen, &SVal::Int(0));
            let (zero, non_zero) = state.assume_dual(&is_zero);
            if let Some(zero) = zero {
                ctx.add_transition(zero.bind_expr(call.expr, SVal::Int(0)));
            }
            let Some(non_zero) = non_zero else {
                return;
            };
            state = non_zero;
        }

        let Some(state) = self.check_non_null(ctx, &state, call, 0, description) else {
            return;
        };
        let (mut state, length) = self.c_string_length(ctx, state, &string.value, description, call.span);
        if length.is_undef() {
            return;
        }

        let mut result = SVal::Unknown;
        match &maxlen {
            Some(maxlen) if length.is_nonloc() && maxlen.is_nonloc() => {
                let too_long = SValBuilder::fold_binop(&state, BinaryOp::Gt, &length, maxlen);
                match state.assume_dual(&too_long) {
                    (Some(truncated), None) => {
                        state = truncated;
                        result = maxlen.clone();
                    }
                    (None, Some(fits)) => {
                        state = fits;
                        result = length.clone();
                    }
                    _ => {}
                }
            }
            Some(_) => {}
            None => result = length.clone(),
        }

        if result.is_unknown() {
            result = ctx.svals().conjure_sval(&call.callee, call.return_ty.clone());
            // Undecided strnlen: at most the bound, and the length when known
            if let Some(maxlen) = &maxlen {
                for limit in [&length, maxlen] {
                    if !limit.is_nonloc() {
                        continue;
                    }
                    let below = SValBuilder::fold_binop(&state, BinaryOp::Le, &result, limit);
                    match state.assume(&below, true) {
                        Some(next) => state = next,
                        None => return,
                    }
                }
            }
        }

        trace!("cstring: {} evaluates to {}", call.callee, result);
        ctx.add_transition(state.bind_expr(call.expr, result));
    }
}
