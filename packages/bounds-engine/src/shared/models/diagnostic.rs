//! Diagnostics emitted by the checkers

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Span;

/// Stable finding category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCategory {
    NullArgument,
    #[serde(rename = "not-a-c-string")]
    NotCString,
    BufferOverflowWrite,
    BufferUnderwrite,
    BufferUnderread,
}

impl DiagnosticCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCategory::NullArgument => "null-argument",
            DiagnosticCategory::NotCString => "not-a-c-string",
            DiagnosticCategory::BufferOverflowWrite => "buffer-overflow-write",
            DiagnosticCategory::BufferUnderwrite => "buffer-underwrite",
            DiagnosticCategory::BufferUnderread => "buffer-underread",
        }
    }
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    /// Checker (rule) that produced the finding, e.g. `misrac-2012-21.17`
    pub checker: String,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(
        category: DiagnosticCategory,
        checker: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            category,
            checker: checker.into(),
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.span, self.checker, self.category, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_as_stable_string() {
        let json = serde_json::to_string(&DiagnosticCategory::NotCString).unwrap();
        assert_eq!(json, "\"not-a-c-string\"");
        let json = serde_json::to_string(&DiagnosticCategory::BufferOverflowWrite).unwrap();
        assert_eq!(json, "\"buffer-overflow-write\"");
    }

    #[test]
    fn test_display() {
        let diag = Diagnostic::new(
            DiagnosticCategory::NullArgument,
            "misrac-2012-21.17",
            "Null pointer passed as 1st argument to string length function",
            Span::line(3, 4, 14),
        );
        assert_eq!(
            diag.to_string(),
            "3:4-3:14 [misrac-2012-21.17] null-argument: Null pointer passed as 1st argument to string length function"
        );
    }
}
