//! `strcpy`, `strncpy`, `stpcpy`, `strlcpy`, `strcat`, `strncat`, `strlcat`

use tracing::trace;

use super::cstring_checker::CStringBoundsChecker;
use crate::features::checker_api::{CallEvent, CheckerContext, CheckerHooks};
use crate::features::cstring_bounds::domain::{messages, set_length};
use crate::features::cstring_bounds::infrastructure::{
    invalidate_buffer, select_amount_copied, select_strlcat_amount,
};
use crate::features::function_effects::{ConcatKind, FunctionEffect, StringFamily, StringModel};
use crate::features::symbolic::{BinaryOp, SVal, SValBuilder};
use crate::shared::models::CType;

/// Shape of a copy-like call
#[derive(Debug, Clone, Copy)]
struct CopyShape {
    /// `None` for plain copies
    concat: Option<ConcatKind>,
    returns_ptr: bool,
    returns_end: bool,
}

impl CopyShape {
    fn of(family: StringFamily) -> Option<Self> {
        match family {
            StringFamily::Copy {
                returns_end,
                returns_ptr,
            } => Some(Self {
                concat: None,
                returns_ptr,
                returns_end,
            }),
            StringFamily::Concat { kind, returns_ptr } => Some(Self {
                concat: Some(kind),
                returns_ptr,
                returns_end: false,
            }),
            _ => None,
        }
    }
}

impl CStringBoundsChecker {
    pub(super) fn eval_copy(
        &self,
        call: &CallEvent,
        effect: &FunctionEffect,
        model: &StringModel,
        ctx: &mut CheckerContext<'_>,
    ) {
        let Some(shape) = CopyShape::of(model.family) else {
            return;
        };
        let description = model.family.description();
        let dst_idx = model.destination.unwrap_or(0);
        let src_idx = model.sources.first().copied().unwrap_or(1);
        let (Some(dst), Some(src)) = (call.arg(dst_idx), call.arg(src_idx)) else {
            return;
        };
        let svals = ctx.svals();

        let state = ctx.state().clone();
        let Some(state) = self.check_non_null(ctx, &state, call, dst_idx, description) else {
            return;
        };
        let Some(state) = self.check_non_null(ctx, &state, call, src_idx, description) else {
            return;
        };

        let (state, src_len) = self.c_string_length(ctx, state, &src.value, description, call.span);
        if src_len.is_undef() {
            return;
        }
        // Only appending calls read the destination as a string
        let (mut state, dst_len) = if effect.string_reads.contains(dst_idx) {
            self.c_string_length(ctx, state, &dst.value, description, call.span)
        } else {
            (state, SVal::Unknown)
        };

        let mut amount = SVal::Unknown;
        let mut max_last: Option<(SVal, &'static str)> = None;

        if let Some(bound_idx) = model.bound {
            let bound = call
                .arg(bound_idx)
                .map(|arg| arg.value.clone())
                .unwrap_or(SVal::Unknown);

            if src_len.is_nonloc() && bound.is_nonloc() {
                match shape.concat {
                    Some(ConcatKind::Strlcat) => {
                        if !dst_len.is_nonloc() {
                            return;
                        }
                        match select_strlcat_amount(&state, &src_len, &bound, &dst_len) {
                            Some(selected) => amount = selected,
                            None => return,
                        }
                    }
                    _ => {
                        let (selected, next) = select_amount_copied(&state, &src_len, &bound);
                        amount = selected;
                        state = next;
                    }
                }
            }

            if bound.is_nonloc() {
                match shape.concat {
                    Some(ConcatKind::Strcat) => {
                        if dst_len.is_undef() {
                            return;
                        }
                        if dst_len.is_nonloc() {
                            let last = SValBuilder::fold_binop(&state, BinaryOp::Add, &bound, &dst_len);
                            max_last = Some((last, messages::BOUND_EXCEEDS_FREE_SPACE));
                        }
                    }
                    _ => {
                        let is_zero = SValBuilder::fold_binop(&state, BinaryOp::Eq, &bound, &SVal::Int(0));
                        if let (Some(zero), None) = state.assume_dual(&is_zero) {
                            // Nothing is written
                            let result = if shape.returns_ptr {
                                dst.value.clone()
                            } else if shape.concat.is_none() {
                                src_len.clone()
                            } else {
                                svals.eval_binop(&state, BinaryOp::Add, &src_len, &dst_len)
                            };
                            ctx.add_transition(zero.bind_expr(call.expr, result));
                            return;
                        }
                        let last = SValBuilder::fold_binop(&state, BinaryOp::Sub, &bound, &SVal::Int(1));
                        max_last = Some((last, messages::BOUND_EXCEEDS_DESTINATION));
                    }
                }
            }
        } else {
            amount = src_len.clone();
        }

        // strlcpy returns strlen(src); strlcat strlen(src) + strlen(dst)
        let mut length_result = SVal::Unknown;
        if shape.concat.is_none() && !shape.returns_ptr {
            length_result = src_len.clone();
        }

        let mut final_len = match shape.concat {
            None => amount.clone(),
            Some(kind) => {
                if dst_len.is_undef() {
                    return;
                }
                if kind == ConcatKind::Strlcat && dst_len.is_nonloc() && src_len.is_nonloc() {
                    length_result = SValBuilder::fold_binop(&state, BinaryOp::Add, &src_len, &dst_len);
                }
                let mut final_len = if amount.is_nonloc() && dst_len.is_nonloc() {
                    SValBuilder::fold_binop(&state, BinaryOp::Add, &amount, &dst_len)
                } else {
                    SVal::Unknown
                };
                if final_len.is_unknown() {
                    final_len = self.hypothetical_length(svals, &state, &dst.value);
                    if final_len.is_nonloc() && dst_len.is_nonloc() {
                        let extends = SValBuilder::fold_binop(&state, BinaryOp::Ge, &final_len, &dst_len);
                        match state.assume(&extends, true) {
                            Some(next) => state = next,
                            None => return,
                        }
                    }
                }
                final_len
            }
        };

        let mut result = if shape.returns_ptr {
            if shape.returns_end {
                SVal::Unknown
            } else {
                dst.value.clone()
            }
        } else {
            length_result
        };

        if let Some(dst_region) = dst.value.as_region() {
            if let Some((last, warning)) = max_last.as_ref().filter(|(last, _)| last.is_nonloc()) {
                let element = svals.eval_ptr_offset(&state, &dst.value, last, &CType::Char);
                match self.check_write_in_bounds(ctx, state, &element, warning, call.span) {
                    Some(next) => state = next,
                    None => return,
                }
            }

            if final_len.is_nonloc() {
                let last_element = svals.eval_ptr_offset(&state, &dst.value, &final_len, &CType::Char);
                if max_last.is_none() {
                    let message = messages::overflows_destination(description);
                    match self.check_write_in_bounds(ctx, state, &last_element, &message, call.span) {
                        Some(next) => state = next,
                        None => return,
                    }
                }
                if shape.returns_ptr && shape.returns_end {
                    result = last_element;
                }
            }

            let (next, changed) = invalidate_buffer(&state, svals, &dst.value, false);
            state = self.check_region_changes(next, &changed);
            let (next, _) = invalidate_buffer(&state, svals, &src.value, true);
            state = next;

            // A truncating strncpy may leave the destination unterminated
            if model.is_bounded() && shape.concat.is_none() && amount != src_len {
                final_len = SVal::Unknown;
            }
            state = set_length(&state, dst_region, final_len);
        }

        if shape.returns_ptr && shape.returns_end && result.is_unknown() {
            result = svals.conjure_sval(&call.callee, call.return_ty.clone());
        }
        trace!("cstring: {} returns {}", call.callee, result);
        ctx.add_transition(state.bind_expr(call.expr, result));
    }
}
