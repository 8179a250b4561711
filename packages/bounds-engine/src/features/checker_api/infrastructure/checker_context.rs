//! Per-callback checker context

use tracing::debug;

use crate::features::symbolic::{ProgramState, SValBuilder};
use crate::shared::models::Diagnostic;

/// What a callback produced
#[derive(Debug, Default)]
pub struct CheckerOutcome {
    pub successors: Vec<ProgramState>,
    pub reports: Vec<Diagnostic>,
    /// The callback did something observable (transition or report)
    pub changed: bool,
}

pub struct CheckerContext<'a> {
    svals: &'a SValBuilder,
    predecessor: ProgramState,
    checker: &'static str,
    transitions: Vec<ProgramState>,
    reports: Vec<Diagnostic>,
    sunk: bool,
}

impl<'a> CheckerContext<'a> {
    pub fn new(svals: &'a SValBuilder, predecessor: ProgramState, checker: &'static str) -> Self {
        Self {
            svals,
            predecessor,
            checker,
            transitions: Vec::new(),
            reports: Vec::new(),
            sunk: false,
        }
    }

    pub fn state(&self) -> &ProgramState {
        &self.predecessor
    }

    pub fn svals(&self) -> &'a SValBuilder {
        self.svals
    }

    pub fn checker_name(&self) -> &'static str {
        self.checker
    }

    pub fn add_transition(&mut self, state: ProgramState) {
        self.transitions.push(state);
    }

    /// Report and stop the path here
    pub fn emit_error(&mut self, report: Diagnostic) {
        debug!("{}: fatal report: {}", self.checker, report.message);
        self.reports.push(report);
        self.sunk = true;
    }

    /// Report and let the path continue from `state`
    pub fn emit_non_fatal(&mut self, state: ProgramState, report: Diagnostic) {
        debug!("{}: report: {}", self.checker, report.message);
        self.reports.push(report);
        self.transitions.push(state);
    }

    pub fn is_different(&self) -> bool {
        !self.transitions.is_empty() || !self.reports.is_empty()
    }

    pub fn finish(self) -> CheckerOutcome {
        let changed = self.is_different();
        let successors = if self.transitions.is_empty() && !self.sunk {
            vec![self.predecessor]
        } else {
            self.transitions
        };
        CheckerOutcome {
            successors,
            reports: self.reports,
            changed,
        }
    }
}
