//! Test fixtures: buffers, strings, configured managers

use bounds_engine::config::{
    AnalyzerConfig, CHECKER_CSTRING_BOUNDS, CHECKER_UNDERREAD, CHECKER_UNDERWRITE,
};
use bounds_engine::features::symbolic::{Region, SVal, SValBuilder};
use bounds_engine::shared::models::CType;
use bounds_engine::{CheckerManager, CheckerRegistry};

/// `char name[len]` local
pub fn char_buffer(decl: u32, name: &str, len: u64) -> Region {
    Region::var(decl, name, CType::array(CType::Char, len))
}

/// `int name[len]` local
pub fn int_buffer(decl: u32, name: &str, len: u64) -> Region {
    Region::var(decl, name, CType::array(CType::Int, len))
}

/// Array-to-pointer decay: `&buffer[0]`
pub fn decay(region: &Region) -> SVal {
    SVal::region(Region::element(region, CType::Char, SVal::Int(0)))
}

pub fn literal(id: u32, text: &str) -> SVal {
    SVal::region(Region::string_literal(id, text.as_bytes().to_vec()))
}

/// A `char *` parameter of unknown provenance
pub fn unknown_string(svals: &SValBuilder, tag: &str) -> SVal {
    svals.conjure_sval(tag, CType::char_ptr())
}

pub fn cstring_manager() -> CheckerManager {
    manager_with(&[CHECKER_CSTRING_BOUNDS])
}

pub fn under_access_manager() -> CheckerManager {
    manager_with(&[CHECKER_UNDERWRITE, CHECKER_UNDERREAD])
}

pub fn full_manager() -> CheckerManager {
    CheckerRegistry::build(&AnalyzerConfig::default()).expect("default configuration builds")
}

pub fn manager_with(checkers: &[&str]) -> CheckerManager {
    let config = AnalyzerConfig::with_checkers(checkers.iter().copied());
    CheckerRegistry::build(&config).expect("configuration builds")
}
