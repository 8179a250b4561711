//! `strchr`, `strrchr`, `strspn`, `strcspn`, `strstr`, `strpbrk`, `strtok`, `strsep`

use tracing::trace;

use super::cstring_checker::{assume_null, CStringBoundsChecker};
use crate::features::checker_api::{CallEvent, CheckerContext, CheckerHooks};
use crate::features::cstring_bounds::infrastructure::invalidate_buffer;
use crate::features::function_effects::{SearchKind, StringModel};
use crate::features::symbolic::{BinaryOp, SVal, SValBuilder};
use crate::shared::models::CType;

impl CStringBoundsChecker {
    pub(super) fn eval_search(
        &self,
        call: &CallEvent,
        model: &StringModel,
        kind: SearchKind,
        ctx: &mut CheckerContext<'_>,
    ) {
        let description = model.family.description();
        let mut state = ctx.state().clone();
        for &idx in model.sources {
            state = match self.check_non_null(ctx, &state, call, idx, description) {
                Some(next) => next,
                None => return,
            };
        }

        let mut lengths = Vec::with_capacity(model.sources.len());
        for &idx in model.sources {
            let Some(arg) = call.arg(idx) else {
                continue;
            };
            let (next, length) = self.c_string_length(ctx, state, &arg.value, description, call.span);
            if length.is_undef() {
                return;
            }
            state = next;
            lengths.push(length);
        }

        let result = ctx.svals().conjure_sval(&call.callee, call.return_ty.clone());
        // A span never extends past the scanned string
        if kind == SearchKind::Span {
            if let Some(length) = lengths.first().filter(|length| length.is_nonloc()) {
                let within = SValBuilder::fold_binop(&state, BinaryOp::Le, &result, length);
                state = match state.assume(&within, true) {
                    Some(next) => next,
                    None => return,
                };
            }
        }
        ctx.add_transition(state.bind_expr(call.expr, result));
    }

    /// `strtok(str, delim)`; `str` may be null to continue the last string
    pub(super) fn eval_strtok(&self, call: &CallEvent, model: &StringModel, ctx: &mut CheckerContext<'_>) {
        let description = model.family.description();
        let (Some(string), Some(delimiters)) = (call.arg(0), call.arg(1)) else {
            return;
        };
        let svals = ctx.svals();

        let state = ctx.state().clone();
        let Some(state) = self.check_non_null(ctx, &state, call, 1, description) else {
            return;
        };
        let (mut state, delimiters_len) =
            self.c_string_length(ctx, state, &delimiters.value, description, call.span);
        if delimiters_len.is_undef() {
            return;
        }

        let provably_null = matches!(assume_null(svals, &state, &string.value), (Some(_), None));
        if !provably_null {
            let (next, length) = self.c_string_length(ctx, state, &string.value, description, call.span);
            if length.is_undef() {
                return;
            }
            // Tokenizing writes NULs into the string
            let (next, changed) = invalidate_buffer(&next, svals, &string.value, false);
            state = self.check_region_changes(next, &changed);
        }

        let result = svals.conjure_sval(&call.callee, call.return_ty.clone());
        ctx.add_transition(state.bind_expr(call.expr, result));
    }

    /// `strsep(&str, delim)`: returns the old `*stringp` and advances it
    pub(super) fn eval_strsep(&self, call: &CallEvent, model: &StringModel, ctx: &mut CheckerContext<'_>) {
        let description = model.family.description();
        let (Some(slot), Some(delimiters)) = (call.arg(0), call.arg(1)) else {
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
        let (mut state, delimiters_len) =
            self.c_string_length(ctx, state, &delimiters.value, description, call.span);
        if delimiters_len.is_undef() {
            return;
        }

        let result = match slot.value.as_region() {
            Some(slot_region) => {
                let current = state.get_sval(slot_region);
                trace!("cstring: strsep splits {}", current);
                let (next, changed) = invalidate_buffer(&state, svals, &current, false);
                state = self.check_region_changes(next, &changed);

                let advanced = svals.conjure_sval("strsep.next", CType::char_ptr());
                state = state.bind(slot_region.clone(), advanced);
                state = self.check_region_changes(state, std::slice::from_ref(slot_region));
                current
            }
            None => svals.conjure_sval(&call.callee, call.return_ty.clone()),
        };
        ctx.add_transition(state.bind_expr(call.expr, result));
    }
}
