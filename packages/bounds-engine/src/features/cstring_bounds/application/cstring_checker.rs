//! C string bounds checker (MISRA C:2012 Rule 21.17)
//!
//! Models the `<string.h>` functions listed in the function effect
//! catalogue: every pointer argument must be non-null, every string
//! argument must be null-terminated inside its buffer, and copies must
//! stay inside the destination. Logical string lengths are tracked per
//! region so later calls on the same path see what earlier calls wrote.
//!
//! Null arguments and overflows stop the path. An argument that is not a
//! C string is reported and the path continues without modeling the call.

use tracing::{debug, trace};

use crate::config::{CStringConfig, CHECKER_CSTRING_BOUNDS};
use crate::features::checker_api::{CallEvent, CheckerContext, CheckerHooks, DeclStmt, Initializer};
use crate::features::cstring_bounds::domain::{
    forget_changed, messages, recorded_length, set_length, LENGTH_MAP, LENGTH_TAG,
};
use crate::features::cstring_bounds::infrastructure::scan_for_terminator;
use crate::features::function_effects::{lookup, StringFamily};
use crate::features::symbolic::{
    BinaryOp, Loc, ProgramState, Region, RegionKind, SVal, SValBuilder, SymbolReaper,
};
use crate::shared::models::{CType, Diagnostic, DiagnosticCategory, Span};

#[derive(Debug, Clone, Default)]
pub struct CStringBoundsChecker {
    config: CStringConfig,
}

impl CStringBoundsChecker {
    pub const NAME: &'static str = CHECKER_CSTRING_BOUNDS;

    pub fn new(config: CStringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CStringConfig {
        &self.config
    }

    // ═══════════════════════════════════════════════════════════════
    // Reports
    // ═══════════════════════════════════════════════════════════════

    fn diagnostic(category: DiagnosticCategory, message: impl Into<String>, span: Span) -> Diagnostic {
        Diagnostic::new(category, Self::NAME, message, span)
    }

    fn report_not_c_string(&self, ctx: &mut CheckerContext<'_>, state: &ProgramState, message: String, span: Span) {
        ctx.emit_non_fatal(
            state.clone(),
            Self::diagnostic(DiagnosticCategory::NotCString, message, span),
        );
    }

    // ═══════════════════════════════════════════════════════════════
    // Argument checks
    // ═══════════════════════════════════════════════════════════════

    /// State in which argument `idx` is non-null.
    ///
    /// `None` when the argument is provably null (reported, path sunk) or
    /// the state is infeasible.
    pub(super) fn check_non_null(
        &self,
        ctx: &mut CheckerContext<'_>,
        state: &ProgramState,
        call: &CallEvent,
        idx: usize,
        description: &str,
    ) -> Option<ProgramState> {
        let Some(arg) = call.arg(idx) else {
            return Some(state.clone());
        };
        let (null, non_null) = assume_null(ctx.svals(), state, &arg.value);
        match (null, non_null) {
            (Some(_), None) => {
                ctx.emit_error(Self::diagnostic(
                    DiagnosticCategory::NullArgument,
                    messages::null_argument(idx, description),
                    call.span,
                ));
                None
            }
            (_, non_null) => non_null,
        }
    }

    /// Logical length of the string `value` points to.
    ///
    /// `Undefined` means the argument was reported as not a C string and
    /// the caller must stop modeling.
    pub(super) fn c_string_length(
        &self,
        ctx: &mut CheckerContext<'_>,
        state: ProgramState,
        value: &SVal,
        description: &str,
        span: Span,
    ) -> (ProgramState, SVal) {
        let region = match value {
            SVal::Loc(Loc::Region(region)) => region,
            SVal::Loc(Loc::Label(label)) => {
                self.report_not_c_string(ctx, &state, messages::label_argument(description, label), span);
                return (state, SVal::Undefined);
            }
            _ => return (state, SVal::Unknown),
        };

        let termination =
            scan_for_terminator(&state, ctx.svals(), value, self.config.max_scan_elements);
        if !termination.is_acceptable() {
            self.report_not_c_string(ctx, &state, messages::unterminated_buffer(description), span);
            return (state, SVal::Undefined);
        }

        let region = region.strip_casts();
        match region.kind() {
            RegionKind::StringLiteral { bytes, .. } => {
                let length = SVal::Int(bytes.len() as i128);
                (state, length)
            }
            RegionKind::Var { .. }
            | RegionKind::Param { .. }
            | RegionKind::Field { .. }
            | RegionKind::Symbolic { .. }
            | RegionKind::Heap { .. } => self.region_length(ctx.svals(), state, &region, false),
            RegionKind::CompoundLiteral { .. } | RegionKind::Element { .. } => (state, SVal::Unknown),
            RegionKind::FunctionCode { .. }
            | RegionKind::BlockCode
            | RegionKind::BlockData
            | RegionKind::TempObject { .. } => {
                self.report_not_c_string(
                    ctx,
                    &state,
                    messages::non_string_region(description, &region),
                    span,
                );
                (state, SVal::Undefined)
            }
        }
    }

    /// Recorded length of `region`, or a fresh bounded metadata symbol.
    ///
    /// A `hypothetical` lookup always conjures and records nothing.
    pub(super) fn region_length(
        &self,
        svals: &SValBuilder,
        state: ProgramState,
        region: &Region,
        hypothetical: bool,
    ) -> (ProgramState, SVal) {
        if !hypothetical {
            if let Some(length) = recorded_length(&state, region) {
                return (state, length);
            }
        }

        let length = SVal::symbol(svals.metadata_symbol(region, LENGTH_TAG, CType::SizeT));
        if hypothetical {
            return (state, length);
        }

        // Fresh lengths stay well below SIZE_MAX so `len + k` cannot wrap
        let max_length = CType::SizeT.max_value() / i128::from(self.config.length_bound_divisor);
        let bounded = SValBuilder::fold_binop(&state, BinaryOp::Le, &length, &SVal::Int(max_length));
        let state = state.assume(&bounded, true).unwrap_or(state);
        let state = set_length(&state, region, length.clone());
        (state, length)
    }

    /// Hypothetical length of the destination `value` points to
    pub(super) fn hypothetical_length(&self, svals: &SValBuilder, state: &ProgramState, value: &SVal) -> SVal {
        match value.as_region().map(Region::strip_casts) {
            Some(region) if region.has_trackable_identity() => {
                self.region_length(svals, state.clone(), &region, true).1
            }
            _ => SVal::Unknown,
        }
    }

    /// Check a write to `element`; `None` when it is provably out of bounds
    pub(super) fn check_write_in_bounds(
        &self,
        ctx: &mut CheckerContext<'_>,
        state: ProgramState,
        element: &SVal,
        message: &str,
        span: Span,
    ) -> Option<ProgramState> {
        let Some(region) = element.as_region() else {
            return Some(state);
        };
        let RegionKind::Element {
            element_ty,
            index,
            parent,
        } = region.kind()
        else {
            return Some(state);
        };
        if !element_ty.is_char() {
            return Some(state);
        }

        let extent = state.dynamic_extent(parent);
        let in_bound = state.assume_in_bound(index, &extent, true);
        let out_of_bound = state.assume_in_bound(index, &extent, false);
        match (in_bound, out_of_bound) {
            (None, Some(_)) => {
                ctx.emit_error(Self::diagnostic(
                    DiagnosticCategory::BufferOverflowWrite,
                    message,
                    span,
                ));
                None
            }
            (in_bound, _) => in_bound,
        }
    }
}

/// `(value is null, value is non-null)`
pub(super) fn assume_null(
    svals: &SValBuilder,
    state: &ProgramState,
    value: &SVal,
) -> (Option<ProgramState>, Option<ProgramState>) {
    if value.is_unknown_or_undef() {
        return (Some(state.clone()), Some(state.clone()));
    }
    let zero = if value.is_loc() { SVal::null() } else { SVal::Int(0) };
    let is_null = svals.eval_eq(state, value, &zero);
    state.assume_dual(&is_null)
}

impl CheckerHooks for CStringBoundsChecker {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn eval_call(&self, call: &CallEvent, ctx: &mut CheckerContext<'_>) -> bool {
        let Some(effect) = lookup(&call.callee, call.num_args()) else {
            return false;
        };
        let Some(model) = effect.string_model.as_ref() else {
            return false;
        };
        if !call.has_scalar_args() {
            trace!("cstring: {} has non-scalar arguments, not modeled", call.callee);
            return false;
        }

        debug!("cstring: modeling {} as {}", call.callee, model.family.description());
        match model.family {
            StringFamily::Length => self.eval_strlen(call, model, ctx),
            StringFamily::Copy { .. } | StringFamily::Concat { .. } => {
                self.eval_copy(call, effect, model, ctx)
            }
            StringFamily::Compare { ignore_case } => self.eval_strcmp(call, model, ignore_case, ctx),
            StringFamily::Search(kind) => self.eval_search(call, model, kind, ctx),
            StringFamily::Tokenize => self.eval_strtok(call, model, ctx),
            StringFamily::Separate => self.eval_strsep(call, model, ctx),
        }
        ctx.is_different()
    }

    fn check_pre_stmt(&self, decl: &DeclStmt, ctx: &mut CheckerContext<'_>) {
        let mut state = ctx.state().clone();
        for var in &decl.decls {
            if !var.ty.is_array() {
                continue;
            }
            let Some(Initializer::StringLiteral { value, .. }) = &var.init else {
                continue;
            };
            let Some(bytes) = value
                .as_region()
                .map(Region::strip_casts)
                .and_then(|literal| literal.literal_bytes().map(<[u8]>::len))
            else {
                continue;
            };
            state = set_length(&state, &var.region, SVal::Int(bytes as i128));
        }
        if &state != ctx.state() {
            ctx.add_transition(state);
        }
    }

    fn check_region_changes(&self, state: ProgramState, changed: &[Region]) -> ProgramState {
        forget_changed(state, changed)
    }

    fn check_live_symbols(&self, state: &ProgramState, reaper: &mut SymbolReaper) {
        for length in state.region_map(LENGTH_MAP).values() {
            for symbol in length.symbols() {
                reaper.mark_in_use(&symbol);
            }
        }
    }

    fn check_dead_symbols(&self, reaper: &SymbolReaper, ctx: &mut CheckerContext<'_>) {
        let facts = ctx.state().region_map(LENGTH_MAP);
        if facts.is_empty() {
            return;
        }
        let mut kept = facts.clone();
        for (region, length) in facts.iter() {
            // A compound length dies with any symbol it mentions
            if length.symbols().iter().any(|symbol| reaper.is_dead(symbol)) {
                trace!("cstring: length of {} is dead", region);
                kept.remove(region);
            }
        }
        if kept.len() == facts.len() {
            return;
        }
        let state = ctx.state().set_region_map(LENGTH_MAP, kept);
        ctx.add_transition(state);
    }
}
