//! Analyzer configuration
//!
//! Which checkers run, plus the tunables of the C-string bounds engine.
//! Every field except `version` has a default, so a YAML file only needs
//! to name what it changes.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::{ConfigError, ConfigResult};

/// Bounds engine (MISRA C:2012 Rule 21.17)
pub const CHECKER_CSTRING_BOUNDS: &str = "misrac-2012-21.17";
/// Buffer underwrite (CWE-124)
pub const CHECKER_UNDERWRITE: &str = "cwe-124";
/// Buffer underread (CWE-127)
pub const CHECKER_UNDERREAD: &str = "cwe-127";

pub const KNOWN_CHECKERS: &[&str] = &[
    CHECKER_CSTRING_BOUNDS,
    CHECKER_UNDERWRITE,
    CHECKER_UNDERREAD,
];

pub const SUPPORTED_VERSIONS: &[u32] = &[1];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Schema version (always 1)
    pub version: u32,

    /// Enabled checker names
    #[serde(default = "default_checkers")]
    pub checkers: Vec<String>,

    #[serde(default)]
    pub cstring: CStringConfig,
}

/// Tunables of the C-string bounds engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CStringConfig {
    /// Fresh string lengths are assumed `<= SIZE_MAX / divisor`
    pub length_bound_divisor: u64,

    /// Elements inspected when searching a buffer for its terminator
    pub max_scan_elements: u64,
}

impl Default for CStringConfig {
    fn default() -> Self {
        Self {
            length_bound_divisor: 4,
            max_scan_elements: 4096,
        }
    }
}

impl CStringConfig {
    pub fn length_bound_divisor(mut self, divisor: u64) -> Self {
        self.length_bound_divisor = divisor;
        self
    }

    pub fn max_scan_elements(mut self, elements: u64) -> Self {
        self.max_scan_elements = elements;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(1..=1024).contains(&self.length_bound_divisor) {
            return Err(ConfigError::range_with_hint(
                "cstring.length_bound_divisor",
                self.length_bound_divisor,
                1,
                1024,
                "The divisor keeps conjured lengths away from SIZE_MAX; 4 is the usual choice",
            ));
        }
        if !(1..=1_048_576).contains(&self.max_scan_elements) {
            return Err(ConfigError::range_with_hint(
                "cstring.max_scan_elements",
                self.max_scan_elements,
                1,
                1_048_576,
                "Buffers longer than the scan budget are accepted without a terminator check",
            ));
        }
        Ok(())
    }
}

fn default_checkers() -> Vec<String> {
    KNOWN_CHECKERS.iter().map(|name| name.to_string()).collect()
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            checkers: default_checkers(),
            cstring: CStringConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Configuration running only `checkers`
    pub fn with_checkers<I, S>(checkers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            checkers: checkers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn cstring(mut self, f: impl FnOnce(CStringConfig) -> CStringConfig) -> Self {
        self.cstring = f(self.cstring);
        self
    }

    pub fn is_enabled(&self, checker: &str) -> bool {
        self.checkers.iter().any(|name| name == checker)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }
        if let Some(unknown) = self
            .checkers
            .iter()
            .find(|name| !KNOWN_CHECKERS.contains(&name.as_str()))
        {
            return Err(ConfigError::unknown_checker(unknown.clone(), KNOWN_CHECKERS));
        }
        if self.checkers.is_empty() {
            warn!("configuration enables no checkers; analysis will report nothing");
        }
        self.cstring.validate()
    }
}
