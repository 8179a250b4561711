//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! A feature contains some of:
//! - domain/     - Pure logic over the symbolic model
//! - ports/      - Interface definitions (traits)
//! - application/ - Checker hooks
//! - infrastructure/ - State and table plumbing

/// Regions, symbolic values, program states
pub mod symbolic;

/// Host interface: events, hooks, driver
pub mod checker_api;

/// Static C library knowledge
pub mod function_effects;

/// MISRA C:2012 Rule 21.17
pub mod cstring_bounds;

/// CWE-124 / CWE-127
pub mod under_access;
