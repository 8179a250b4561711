//! Buffer under-access checker (CWE-124 / CWE-127)
//!
//! Checks every dereference of an element region, and every argument a
//! catalogued library function reads or writes, for a byte offset that
//! lies before the start of its base region.
//!
//! A path is reported only when the offset is provably negative. When
//! both outcomes are feasible the checker stays silent and continues on
//! the in-bound branch.

use tracing::{debug, trace};

use crate::features::checker_api::{CallEvent, CheckerContext, CheckerHooks};
use crate::features::function_effects::lookup;
use crate::features::symbolic::{BinaryOp, ProgramState, SVal, SValBuilder};
use crate::features::under_access::domain::{
    AccessKind, RegionRawOffset, UnderAccessFilter, BUG_CATEGORY, BUG_TYPE,
};
use crate::features::under_access::infrastructure::simplify_offsets;
use crate::shared::models::{Diagnostic, Span};

/// Start of every base region, as a byte offset
const EXTENT_BEGIN: i128 = 0;

/// Verdict of a single offset check
enum OffsetCheck {
    /// Continue on this state
    Within(ProgramState),
    /// Offset provably precedes the buffer
    Precedes,
}

#[derive(Debug, Clone, Default)]
pub struct BufferUnderAccessChecker {
    filter: UnderAccessFilter,
}

impl BufferUnderAccessChecker {
    pub const NAME: &'static str = "buffer-under-access";

    pub fn new(filter: UnderAccessFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> UnderAccessFilter {
        self.filter
    }

    pub fn enable(&mut self, kind: AccessKind) {
        self.filter.enable(kind);
    }

    fn check_neg_element(&self, state: &ProgramState, location: &SVal) -> OffsetCheck {
        let Some(raw) = RegionRawOffset::compute(state, location) else {
            return OffsetCheck::Within(state.clone());
        };

        let (offset, begin) = simplify_offsets(raw.byte_offset().clone(), EXTENT_BEGIN);
        let precedes = SValBuilder::fold_binop(state, BinaryOp::Lt, &offset, &SVal::Int(begin));
        if !precedes.is_nonloc() {
            return OffsetCheck::Within(state.clone());
        }

        match state.assume_dual(&precedes) {
            (Some(_), None) => OffsetCheck::Precedes,
            (_, Some(within)) => {
                trace!("offset {} of {} assumed >= {}", offset, raw.base(), begin);
                OffsetCheck::Within(within)
            }
            (None, None) => OffsetCheck::Within(state.clone()),
        }
    }

    fn emit_bug(&self, ctx: &mut CheckerContext<'_>, kind: AccessKind, span: Span) {
        debug!("{} ({}) at {}", BUG_TYPE, BUG_CATEGORY, span);
        ctx.emit_error(Diagnostic::new(
            kind.category(),
            kind.checker_name(),
            kind.message(),
            span,
        ));
    }
}

impl CheckerHooks for BufferUnderAccessChecker {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check_location(
        &self,
        location: &SVal,
        is_load: bool,
        span: Span,
        ctx: &mut CheckerContext<'_>,
    ) {
        let kind = AccessKind::from_is_load(is_load);
        if !self.filter.checks(kind) {
            return;
        }
        match self.check_neg_element(ctx.state(), location) {
            OffsetCheck::Precedes => self.emit_bug(ctx, kind, span),
            OffsetCheck::Within(state) => {
                if &state != ctx.state() {
                    ctx.add_transition(state);
                }
            }
        }
    }

    fn check_pre_call(&self, call: &CallEvent, ctx: &mut CheckerContext<'_>) {
        let Some(effect) = lookup(&call.callee, call.num_args()) else {
            return;
        };

        let mut state = ctx.state().clone();
        let accesses = [
            (AccessKind::Read, &effect.reads),
            (AccessKind::Write, &effect.writes),
        ];
        for (kind, positions) in accesses {
            if !self.filter.checks(kind) {
                continue;
            }
            for idx in positions.positions(call.num_args()) {
                let Some(arg) = call.arg(idx) else {
                    continue;
                };
                match self.check_neg_element(&state, &arg.value) {
                    OffsetCheck::Precedes => {
                        trace!("argument {} of {} precedes its buffer", idx, call.callee);
                        self.emit_bug(ctx, kind, call.span);
                        return;
                    }
                    OffsetCheck::Within(next) => state = next,
                }
            }
        }

        if &state != ctx.state() {
            ctx.add_transition(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::checker_api::CallArg;
    use crate::features::symbolic::Region;
    use crate::shared::models::{CType, DiagnosticCategory, ExprId};

    fn run_location(
        checker: &BufferUnderAccessChecker,
        svals: &SValBuilder,
        state: ProgramState,
        location: &SVal,
        is_load: bool,
    ) -> (Vec<ProgramState>, Vec<Diagnostic>) {
        let mut ctx = CheckerContext::new(svals, state, BufferUnderAccessChecker::NAME);
        checker.check_location(location, is_load, Span::line(3, 4, 10), &mut ctx);
        let outcome = ctx.finish();
        (outcome.successors, outcome.reports)
    }

    fn ints() -> Region {
        Region::var(1, "xs", CType::array(CType::Int, 8))
    }

    #[test]
    fn test_negative_constant_index_is_reported() {
        let svals = SValBuilder::new();
        let checker = BufferUnderAccessChecker::new(UnderAccessFilter::all());
        let loc = SVal::region(Region::element(&ints(), CType::Int, SVal::Int(-1)));

        let (successors, reports) = run_location(&checker, &svals, ProgramState::new(), &loc, true);
        assert!(successors.is_empty());
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].category, DiagnosticCategory::BufferUnderread);
        assert_eq!(reports[0].checker, "cwe-127");

        let (_, reports) = run_location(&checker, &svals, ProgramState::new(), &loc, false);
        assert_eq!(reports[0].category, DiagnosticCategory::BufferUnderwrite);
    }

    #[test]
    fn test_filter_disables_direction() {
        let svals = SValBuilder::new();
        let checker = BufferUnderAccessChecker::new(UnderAccessFilter {
            check_underread: false,
            check_underwrite: true,
        });
        let loc = SVal::region(Region::element(&ints(), CType::Int, SVal::Int(-2)));
        let (successors, reports) = run_location(&checker, &svals, ProgramState::new(), &loc, true);
        assert!(reports.is_empty());
        assert_eq!(successors.len(), 1);
    }

    #[test]
    fn test_unconstrained_index_is_silent_and_assumed_in_bound() {
        let svals = SValBuilder::new();
        let checker = BufferUnderAccessChecker::new(UnderAccessFilter::all());
        let i = svals.conjure_sval("i", CType::Int);
        let loc = SVal::region(Region::element(&ints(), CType::Int, i.clone()));

        let (successors, reports) = run_location(&checker, &svals, ProgramState::new(), &loc, false);
        assert!(reports.is_empty());
        assert_eq!(successors.len(), 1);
        let negative = svals.eval_binop(&successors[0], BinaryOp::Lt, &i, &SVal::Int(0));
        assert!(successors[0].assume(&negative, true).is_none());
    }

    #[test]
    fn test_call_arguments_use_catalogue() {
        let svals = SValBuilder::new();
        let checker = BufferUnderAccessChecker::new(UnderAccessFilter::all());
        let buf = Region::var(2, "buf", CType::array(CType::Char, 16));
        let before = SVal::region(Region::element(&buf, CType::Char, SVal::Int(-4)));
        let call = CallEvent::new(ExprId(1), "memset", CType::pointer(CType::Void), Span::line(9, 2, 30))
            .with_arg(CallArg::new(ExprId(2), CType::char_ptr(), before, Span::zero()))
            .with_arg(CallArg::new(ExprId(3), CType::Int, SVal::Int(0), Span::zero()))
            .with_arg(CallArg::new(ExprId(4), CType::SizeT, SVal::Int(4), Span::zero()));

        let mut ctx = CheckerContext::new(&svals, ProgramState::new(), BufferUnderAccessChecker::NAME);
        checker.check_pre_call(&call, &mut ctx);
        let outcome = ctx.finish();
        assert_eq!(outcome.reports.len(), 1);
        assert_eq!(outcome.reports[0].category, DiagnosticCategory::BufferUnderwrite);
        assert_eq!(outcome.reports[0].span, Span::line(9, 2, 30));
    }

    #[test]
    fn test_uncatalogued_call_is_ignored() {
        let svals = SValBuilder::new();
        let checker = BufferUnderAccessChecker::new(UnderAccessFilter::all());
        let loc = SVal::region(Region::element(&ints(), CType::Int, SVal::Int(-1)));
        let call = CallEvent::new(ExprId(1), "frobnicate", CType::Void, Span::zero())
            .with_arg(CallArg::new(ExprId(2), CType::pointer(CType::Int), loc, Span::zero()));
        let mut ctx = CheckerContext::new(&svals, ProgramState::new(), BufferUnderAccessChecker::NAME);
        checker.check_pre_call(&call, &mut ctx);
        assert!(!ctx.is_different());
    }
}
