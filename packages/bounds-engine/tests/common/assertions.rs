//! Custom assertions for scenario verification

use bounds_engine::shared::models::{Diagnostic, DiagnosticCategory};
use bounds_engine::CheckerManager;

/// Assert that no checker reported anything
pub fn assert_no_diagnostics(manager: &CheckerManager) {
    assert!(
        manager.diagnostics().is_empty(),
        "Expected no diagnostics, got: {:#?}",
        manager.diagnostics()
    );
}

/// Assert exactly one diagnostic was reported and return it
pub fn assert_single_diagnostic(
    manager: &CheckerManager,
    category: DiagnosticCategory,
) -> &Diagnostic {
    let diagnostics = manager.diagnostics();
    assert_eq!(
        diagnostics.len(),
        1,
        "Expected exactly one diagnostic, got: {:#?}",
        diagnostics
    );
    assert_eq!(diagnostics[0].category, category);
    &diagnostics[0]
}

pub fn assert_category_count(manager: &CheckerManager, category: DiagnosticCategory, expected: usize) {
    let count = manager.reporter().count(category);
    assert_eq!(
        count, expected,
        "Expected {expected} {category} diagnostics, got {count}: {:#?}",
        manager.diagnostics()
    );
}
