//! Checker driver infrastructure

pub mod bug_reporter;
pub mod checker_context;
pub mod checker_manager;

pub use bug_reporter::BugReporter;
pub use checker_context::{CheckerContext, CheckerOutcome};
pub use checker_manager::{CheckerManager, EvalCallResult};
