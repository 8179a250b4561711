//! Invalidation of string buffers touched by a modeled call

use crate::features::symbolic::{
    InvalidationTraits, ProgramState, Region, RegionKind, SVal, SValBuilder,
};

/// Buffer that owns the bytes `value` points to
pub fn buffer_region(value: &SVal) -> Option<Region> {
    let region = value.as_region()?.strip_casts();
    if let RegionKind::Element { parent, .. } = region.kind() {
        return Some(parent.clone());
    }
    Some(region)
}

/// Forget the contents of the buffer `value` points to.
///
/// Sources keep their contents (the call only read them). Returns the
/// regions whose contents changed.
pub fn invalidate_buffer(
    state: &ProgramState,
    svals: &SValBuilder,
    value: &SVal,
    is_source: bool,
) -> (ProgramState, Vec<Region>) {
    let Some(buffer) = buffer_region(value) else {
        return (state.clone(), Vec::new());
    };
    if buffer.literal_bytes().is_some() {
        return (state.clone(), Vec::new());
    }
    let traits = if is_source {
        InvalidationTraits::new().preserve_contents(buffer.clone())
    } else {
        InvalidationTraits::new()
    };
    state.invalidate_regions(&[buffer], &traits, svals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::CType;

    #[test]
    fn test_destination_contents_are_dropped() {
        let svals = SValBuilder::new();
        let buf = Region::var(1, "buf", CType::array(CType::Char, 8));
        let state = ProgramState::new().bind_string_contents(&buf, b"ab");
        let ptr = SVal::region(Region::element(&buf, CType::Char, SVal::Int(2)));

        let (next, changed) = invalidate_buffer(&state, &svals, &ptr, false);
        assert!(changed.contains(&buf));
        let first = Region::element(&buf, CType::Char, SVal::Int(0));
        assert_ne!(next.get_sval(&first), SVal::Int(i128::from(b'a')));
    }

    #[test]
    fn test_source_contents_are_preserved() {
        let svals = SValBuilder::new();
        let buf = Region::var(1, "src", CType::array(CType::Char, 8));
        let state = ProgramState::new().bind_string_contents(&buf, b"ab");
        let ptr = SVal::region(Region::element(&buf, CType::Char, SVal::Int(0)));

        let (next, changed) = invalidate_buffer(&state, &svals, &ptr, true);
        assert!(changed.is_empty());
        assert_eq!(next, state);
    }

    #[test]
    fn test_non_locations_are_ignored() {
        let svals = SValBuilder::new();
        let (next, changed) = invalidate_buffer(&ProgramState::new(), &svals, &SVal::Unknown, false);
        assert!(changed.is_empty());
        assert_eq!(next, ProgramState::new());
    }
}
