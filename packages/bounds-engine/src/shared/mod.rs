//! Shared module - Common types used by every feature
//!
//! Source locations, C types and diagnostics live here. Nothing in this
//! module knows about program states or checkers.

pub mod models;

pub use models::*;
