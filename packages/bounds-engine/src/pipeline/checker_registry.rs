//! Checker registry
//!
//! Turns an [`AnalyzerConfig`] into a ready [`CheckerManager`]. The two
//! CWE rules share a single under-access engine whose direction filter
//! follows whichever of them are enabled.

use tracing::{debug, info};

use crate::config::{
    AnalyzerConfig, CHECKER_CSTRING_BOUNDS, CHECKER_UNDERREAD, CHECKER_UNDERWRITE, KNOWN_CHECKERS,
};
use crate::errors::{AnalyzerError, Result};
use crate::features::checker_api::{CheckerHooks, CheckerManager};
use crate::features::cstring_bounds::CStringBoundsChecker;
use crate::features::under_access::{AccessKind, BufferUnderAccessChecker, UnderAccessFilter};

pub struct CheckerRegistry;

impl CheckerRegistry {
    pub fn known_checkers() -> &'static [&'static str] {
        KNOWN_CHECKERS
    }

    /// Engine instance behind a single rule name
    pub fn checker(name: &str, config: &AnalyzerConfig) -> Result<Box<dyn CheckerHooks>> {
        match name {
            CHECKER_CSTRING_BOUNDS => Ok(Box::new(CStringBoundsChecker::new(config.cstring))),
            CHECKER_UNDERWRITE => Ok(Box::new(BufferUnderAccessChecker::new(UnderAccessFilter {
                check_underread: false,
                check_underwrite: true,
            }))),
            CHECKER_UNDERREAD => Ok(Box::new(BufferUnderAccessChecker::new(UnderAccessFilter {
                check_underread: true,
                check_underwrite: false,
            }))),
            other => Err(AnalyzerError::UnknownChecker(other.to_string())),
        }
    }

    /// Validate `config` and register every enabled checker
    pub fn build(config: &AnalyzerConfig) -> Result<CheckerManager> {
        config.validate()?;
        let mut manager = CheckerManager::new();

        if config.is_enabled(CHECKER_CSTRING_BOUNDS) {
            manager.register(Self::checker(CHECKER_CSTRING_BOUNDS, config)?);
        }

        let mut under_access: Option<BufferUnderAccessChecker> = None;
        for (name, kind) in [
            (CHECKER_UNDERWRITE, AccessKind::Write),
            (CHECKER_UNDERREAD, AccessKind::Read),
        ] {
            if config.is_enabled(name) {
                debug!("enabling {} in the under-access engine", name);
                under_access
                    .get_or_insert_with(BufferUnderAccessChecker::default)
                    .enable(kind);
            }
        }
        if let Some(checker) = under_access {
            manager.register(Box::new(checker));
        }

        info!("analysis configured with checkers {:?}", manager.checker_names());
        Ok(manager)
    }
}
