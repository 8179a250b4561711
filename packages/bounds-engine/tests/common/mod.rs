//! Common test utilities for bounds-engine
//!
//! Shared fixtures, assertions and builders for the scenario tests.

#![allow(dead_code)]

mod assertions;
mod builders;
mod fixtures;

// Re-export all utilities
pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
