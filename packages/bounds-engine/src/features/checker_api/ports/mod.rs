//! Checker ports

pub mod checker_hooks;

pub use checker_hooks::CheckerHooks;
