//! Error types for bounds-engine
//!
//! Analysis findings are diagnostics, never errors; these cover setup and
//! export only.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for bounds-engine operations
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Checker name not known to the registry
    #[error("Unknown checker '{0}'")]
    UnknownChecker(String),

    /// Diagnostic export failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for bounds-engine operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;
