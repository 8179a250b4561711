/*
 * Bounds Engine - Path-Sensitive C Buffer Checkers
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (CType, Span, Diagnostic)
 * - features/    : Vertical slices (symbolic → checker_api → cstring_bounds / under_access)
 * - pipeline/    : Checker registry
 * - config/      : Versioned YAML configuration
 *
 * Checkers:
 * - misrac-2012-21.17 : C string function bounds
 * - cwe-124 / cwe-127 : buffer underwrite / underread
 */

// Crate-level lint configuration
#![allow(clippy::too_many_arguments)] // Hook helpers thread state, context and call
#![allow(clippy::type_complexity)] // Dual assumption results
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;
/// Feature modules (symbolic substrate and checkers)
pub mod features;
/// Checker registry
pub mod pipeline;
/// Configuration system
pub mod config;
/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::AnalyzerConfig;
pub use errors::{AnalyzerError, Result};
pub use features::checker_api::{CallEvent, CheckerHooks, CheckerManager};
pub use features::cstring_bounds::CStringBoundsChecker;
pub use features::under_access::BufferUnderAccessChecker;
pub use pipeline::CheckerRegistry;
pub use shared::models::{Diagnostic, DiagnosticCategory, Span};
