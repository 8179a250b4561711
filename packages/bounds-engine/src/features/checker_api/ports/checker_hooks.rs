//! Checker hook interface
//!
//! Every hook has a no-op default; a checker overrides the ones it needs.
//! Hooks never mutate a state in place: they read the predecessor from the
//! [`CheckerContext`] and hand successors back through it.

use crate::features::checker_api::domain::{CallEvent, DeclStmt};
use crate::features::checker_api::infrastructure::CheckerContext;
use crate::features::symbolic::{ProgramState, Region, SVal, SymbolReaper};
use crate::shared::models::Span;

pub trait CheckerHooks: Send + Sync {
    /// Stable checker name, used for registration and in diagnostics
    fn name(&self) -> &'static str;

    /// Model the call instead of the generic call semantics.
    ///
    /// Returns `true` when the checker took over the call.
    fn eval_call(&self, _call: &CallEvent, _ctx: &mut CheckerContext<'_>) -> bool {
        false
    }

    fn check_pre_call(&self, _call: &CallEvent, _ctx: &mut CheckerContext<'_>) {}

    /// A load (`is_load`) or store through `location`
    fn check_location(
        &self,
        _location: &SVal,
        _is_load: bool,
        _span: Span,
        _ctx: &mut CheckerContext<'_>,
    ) {
    }

    fn check_pre_stmt(&self, _decl: &DeclStmt, _ctx: &mut CheckerContext<'_>) {}

    /// Contents of `changed` were overwritten by something the checker did not model
    fn check_region_changes(&self, state: ProgramState, _changed: &[Region]) -> ProgramState {
        state
    }

    fn check_live_symbols(&self, _state: &ProgramState, _reaper: &mut SymbolReaper) {}

    fn check_dead_symbols(&self, _reaper: &SymbolReaper, _ctx: &mut CheckerContext<'_>) {}
}
