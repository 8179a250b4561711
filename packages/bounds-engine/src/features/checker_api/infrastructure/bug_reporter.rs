//! Append-only diagnostic sink

use rustc_hash::FxHashSet;

use crate::errors::Result;
use crate::shared::models::{Diagnostic, DiagnosticCategory, Span};

#[derive(Debug, Default)]
pub struct BugReporter {
    reports: Vec<Diagnostic>,
    seen: FxHashSet<(DiagnosticCategory, Span, String)>,
}

impl BugReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `report` unless an identical one was already emitted.
    ///
    /// Returns whether the report was new.
    pub fn emit(&mut self, report: Diagnostic) -> bool {
        let key = (report.category, report.span, report.message.clone());
        if !self.seen.insert(key) {
            return false;
        }
        self.reports.push(report);
        true
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn count(&self, category: DiagnosticCategory) -> usize {
        self.reports
            .iter()
            .filter(|report| report.category == category)
            .count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.reports)?)
    }
}
