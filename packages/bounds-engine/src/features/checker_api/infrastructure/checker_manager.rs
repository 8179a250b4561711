//! Checker driver
//!
//! Invokes the registered checkers for each event, expanding successor
//! states checker by checker: every state produced by checker `k` is fed to
//! checker `k + 1`. Reports are collected in the owned [`BugReporter`].

use tracing::{info, trace};

use super::bug_reporter::BugReporter;
use super::checker_context::CheckerContext;
use crate::features::checker_api::domain::{CallEvent, DeclStmt};
use crate::features::checker_api::ports::CheckerHooks;
use crate::features::symbolic::{
    InvalidationTraits, ProgramState, Region, SVal, SValBuilder, Symbol, SymbolReaper,
};
use crate::shared::models::{Diagnostic, Span};

/// Result of offering a call to the checkers
#[derive(Debug)]
pub struct EvalCallResult {
    /// Some checker modeled the call
    pub handled: bool,
    pub successors: Vec<ProgramState>,
}

pub struct CheckerManager {
    checkers: Vec<Box<dyn CheckerHooks>>,
    svals: SValBuilder,
    reporter: BugReporter,
}

impl Default for CheckerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckerManager {
    pub fn new() -> Self {
        Self {
            checkers: Vec::new(),
            svals: SValBuilder::new(),
            reporter: BugReporter::new(),
        }
    }

    pub fn register(&mut self, checker: Box<dyn CheckerHooks>) {
        info!("registering checker {}", checker.name());
        self.checkers.push(checker);
    }

    pub fn checker_names(&self) -> Vec<&'static str> {
        self.checkers.iter().map(|checker| checker.name()).collect()
    }

    pub fn svals(&self) -> &SValBuilder {
        &self.svals
    }

    pub fn reporter(&self) -> &BugReporter {
        &self.reporter
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.reporter.diagnostics()
    }

    // ═══════════════════════════════════════════════════════════════
    // Hooks
    // ═══════════════════════════════════════════════════════════════

    /// Let the first interested checker model `call`
    pub fn run_eval_call(&mut self, call: &CallEvent, state: ProgramState) -> EvalCallResult {
        let Self {
            checkers,
            svals,
            reporter,
        } = self;
        for checker in checkers.iter() {
            let mut ctx = CheckerContext::new(svals, state.clone(), checker.name());
            let claimed = checker.eval_call(call, &mut ctx);
            let outcome = ctx.finish();
            if claimed && outcome.changed {
                trace!("{} modeled call to {}", checker.name(), call.callee);
                for report in outcome.reports {
                    reporter.emit(report);
                }
                return EvalCallResult {
                    handled: true,
                    successors: outcome.successors,
                };
            }
        }
        EvalCallResult {
            handled: false,
            successors: vec![state],
        }
    }

    pub fn run_pre_call(&mut self, call: &CallEvent, state: ProgramState) -> Vec<ProgramState> {
        self.run_each(state, |checker, ctx| checker.check_pre_call(call, ctx))
    }

    pub fn run_location(
        &mut self,
        location: &SVal,
        is_load: bool,
        span: Span,
        state: ProgramState,
    ) -> Vec<ProgramState> {
        self.run_each(state, |checker, ctx| {
            checker.check_location(location, is_load, span, ctx)
        })
    }

    pub fn run_pre_stmt(&mut self, decl: &DeclStmt, state: ProgramState) -> Vec<ProgramState> {
        self.run_each(state, |checker, ctx| checker.check_pre_stmt(decl, ctx))
    }

    pub fn run_region_changes(&self, state: ProgramState, changed: &[Region]) -> ProgramState {
        self.checkers
            .iter()
            .fold(state, |state, checker| checker.check_region_changes(state, changed))
    }

    /// Sweep `dead_symbols`/`dead_regions`, after letting checkers keep what they still use
    pub fn run_dead_symbols(
        &mut self,
        state: ProgramState,
        dead_symbols: &[Symbol],
        dead_regions: &[Region],
    ) -> Vec<ProgramState> {
        let mut reaper = SymbolReaper::new(dead_symbols, dead_regions);
        for checker in &self.checkers {
            checker.check_live_symbols(&state, &mut reaper);
        }
        self.run_each(state, |checker, ctx| checker.check_dead_symbols(&reaper, ctx))
    }

    // ═══════════════════════════════════════════════════════════════
    // Unmodeled writes
    // ═══════════════════════════════════════════════════════════════

    /// Store `value` into `region` and notify checkers of the change
    pub fn bind(&self, state: ProgramState, region: Region, value: SVal) -> ProgramState {
        let state = state.bind(region.clone(), value);
        self.run_region_changes(state, &[region])
    }

    /// Invalidate `regions` (e.g. escaped to an unknown call) and notify checkers
    pub fn invalidate(&self, state: ProgramState, regions: &[Region]) -> ProgramState {
        let (state, changed) =
            state.invalidate_regions(regions, &InvalidationTraits::new(), &self.svals);
        self.run_region_changes(state, &changed)
    }

    fn run_each<F>(&mut self, state: ProgramState, mut hook: F) -> Vec<ProgramState>
    where
        F: FnMut(&dyn CheckerHooks, &mut CheckerContext<'_>),
    {
        let Self {
            checkers,
            svals,
            reporter,
        } = self;
        let mut frontier = vec![state];
        for checker in checkers.iter() {
            let mut next = Vec::with_capacity(frontier.len());
            for state in frontier {
                let mut ctx = CheckerContext::new(svals, state, checker.name());
                hook(checker.as_ref(), &mut ctx);
                let outcome = ctx.finish();
                for report in outcome.reports {
                    reporter.emit(report);
                }
                next.extend(outcome.successors);
            }
            frontier = next;
        }
        frontier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{CType, DiagnosticCategory, ExprId};

    struct Recorder;

    impl CheckerHooks for Recorder {
        fn name(&self) -> &'static str {
            "test.recorder"
        }

        fn eval_call(&self, call: &CallEvent, ctx: &mut CheckerContext<'_>) -> bool {
            if call.callee != "modeled" {
                return false;
            }
            let state = ctx.state().bind_expr(call.expr, SVal::Int(7));
            ctx.add_transition(state);
            true
        }

        fn check_pre_call(&self, call: &CallEvent, ctx: &mut CheckerContext<'_>) {
            if call.callee == "bad" {
                ctx.emit_error(Diagnostic::new(
                    DiagnosticCategory::NullArgument,
                    self.name(),
                    "bad call",
                    call.span,
                ));
            }
        }
    }

    fn manager() -> CheckerManager {
        let mut manager = CheckerManager::new();
        manager.register(Box::new(Recorder));
        manager
    }

    #[test]
    fn test_eval_call_dispatch() {
        let mut manager = manager();
        let call = CallEvent::new(ExprId(1), "modeled", CType::Int, Span::zero());
        let result = manager.run_eval_call(&call, ProgramState::new());
        assert!(result.handled);
        assert_eq!(result.successors[0].get_expr(ExprId(1)), SVal::Int(7));

        let other = CallEvent::new(ExprId(2), "other", CType::Int, Span::zero());
        let result = manager.run_eval_call(&other, ProgramState::new());
        assert!(!result.handled);
        assert_eq!(result.successors.len(), 1);
    }

    #[test]
    fn test_sunk_paths_and_dedup() {
        let mut manager = manager();
        let call = CallEvent::new(ExprId(1), "bad", CType::Int, Span::line(1, 0, 5));
        assert!(manager.run_pre_call(&call, ProgramState::new()).is_empty());
        assert!(manager.run_pre_call(&call, ProgramState::new()).is_empty());
        assert_eq!(manager.diagnostics().len(), 1);
    }
}
