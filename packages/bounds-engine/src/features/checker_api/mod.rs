//! Checker API
//!
//! The interface between the path explorer and the checkers: call and
//! declaration events, the [`CheckerHooks`] trait, the per-callback
//! [`CheckerContext`], and the [`CheckerManager`] driver that threads
//! successor states through every registered checker.

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::*;
pub use infrastructure::*;
pub use ports::*;
