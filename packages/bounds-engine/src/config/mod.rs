//! Analyzer configuration
//!
//! A versioned YAML schema selecting the checkers to run and tuning the
//! C-string bounds engine.
//!
//! # Examples
//!
//! ```
//! use bounds_engine::config::AnalyzerConfig;
//!
//! let config = AnalyzerConfig::from_yaml_str(
//!     "version: 1\ncheckers: [cwe-124, cwe-127]\n",
//! )?;
//! assert!(config.is_enabled("cwe-127"));
//! assert!(!config.is_enabled("misrac-2012-21.17"));
//! # Ok::<(), bounds_engine::config::ConfigError>(())
//! ```

pub mod analyzer_config;
pub mod error;
pub mod io;

// Re-exports
pub use analyzer_config::{
    AnalyzerConfig, CStringConfig, CHECKER_CSTRING_BOUNDS, CHECKER_UNDERREAD, CHECKER_UNDERWRITE,
    KNOWN_CHECKERS,
};
pub use error::{ConfigError, ConfigResult};
