//! String-length facts
//!
//! One fact per region: the logical length (terminator excluded) of the
//! C string stored there. Facts live in the per-checker region map of the
//! program state and are only kept for regions with a trackable identity.

use tracing::debug;

use crate::features::symbolic::{ProgramState, Region, SVal};

/// Key of the region map holding the facts
pub const LENGTH_MAP: &str = "cstring.length";
/// Metadata tag of conjured length symbols
pub const LENGTH_TAG: &str = "length";

pub fn recorded_length(state: &ProgramState, region: &Region) -> Option<SVal> {
    state.region_map(LENGTH_MAP).get(&region.strip_casts()).cloned()
}

/// Record `length` for `region`; an unknown length removes the fact
pub fn set_length(state: &ProgramState, region: &Region, length: SVal) -> ProgramState {
    let region = region.strip_casts();
    if !region.has_trackable_identity() {
        return state.clone();
    }
    let mut facts = state.region_map(LENGTH_MAP);
    if length.is_unknown() {
        if facts.remove(&region).is_some() {
            debug!("cstring: dropped length of {}", region);
        }
    } else {
        debug!("cstring: length of {} is {}", region, length);
        facts.insert(region, length);
    }
    state.set_region_map(LENGTH_MAP, facts)
}

/// Drop every fact a write to `changed` may have made stale.
///
/// A fact goes when its region was changed, is an ancestor of a changed
/// region, or lies below a changed region.
pub fn forget_changed(state: ProgramState, changed: &[Region]) -> ProgramState {
    let facts = state.region_map(LENGTH_MAP);
    if facts.is_empty() || changed.is_empty() {
        return state;
    }

    let touches = |region: &Region| {
        changed.iter().any(|written| {
            written == region
                || written.is_sub_region_of(region)
                || region.is_sub_region_of(written)
        })
    };

    let stale: Vec<Region> = facts.keys().filter(|region| touches(region)).cloned().collect();
    if stale.is_empty() {
        return state;
    }
    let mut kept = facts;
    for region in &stale {
        debug!("cstring: length of {} invalidated", region);
        kept.remove(region);
    }
    state.set_region_map(LENGTH_MAP, kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::symbolic::SValBuilder;
    use crate::shared::models::CType;

    fn record() -> Region {
        Region::var(1, "rec", CType::Record { name: "rec".into(), size: 32 })
    }

    #[test]
    fn test_casts_share_a_fact() {
        let buf = Region::var(2, "buf", CType::array(CType::Char, 8));
        let decayed = Region::element(&buf, CType::Char, SVal::Int(0));
        let state = set_length(&ProgramState::new(), &decayed, SVal::Int(3));
        assert_eq!(recorded_length(&state, &buf), Some(SVal::Int(3)));
    }

    #[test]
    fn test_untrackable_regions_are_ignored() {
        let literal = Region::string_literal(1, b"abc".to_vec());
        let state = set_length(&ProgramState::new(), &literal, SVal::Int(3));
        assert_eq!(recorded_length(&state, &literal), None);
    }

    #[test]
    fn test_unknown_length_removes_fact() {
        let field = Region::field(&record(), "name", CType::array(CType::Char, 16));
        let state = set_length(&ProgramState::new(), &field, SVal::Int(5));
        let state = set_length(&state, &field, SVal::Unknown);
        assert_eq!(recorded_length(&state, &field), None);
    }

    #[test]
    fn test_writes_to_ancestors_and_descendants_invalidate() {
        let svals = SValBuilder::new();
        let rec = record();
        let field = Region::field(&rec, "name", CType::array(CType::Char, 16));
        let other = Region::field(&rec, "tag", CType::array(CType::Char, 4));
        let len = svals.conjure_sval("len", CType::SizeT);

        let state = set_length(&ProgramState::new(), &field, len.clone());
        let state = set_length(&state, &other, SVal::Int(1));

        let after_parent_write = forget_changed(state.clone(), &[rec.clone()]);
        assert_eq!(recorded_length(&after_parent_write, &field), None);
        assert_eq!(recorded_length(&after_parent_write, &other), None);

        let byte = Region::element(&field, CType::Char, SVal::Int(3));
        let after_byte_write = forget_changed(state, &[byte]);
        assert_eq!(recorded_length(&after_byte_write, &field), None);
        assert_eq!(recorded_length(&after_byte_write, &other), Some(SVal::Int(1)));
    }
}
