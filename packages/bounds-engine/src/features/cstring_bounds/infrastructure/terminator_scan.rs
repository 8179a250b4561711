//! Null-terminator reachability
//!
//! Walks the bytes of a buffer from index 0 while the index is provably
//! inside the buffer, looking for a byte that may be NUL on this path.

use tracing::trace;

use crate::features::symbolic::{ProgramState, Region, RegionKind, SVal, SValBuilder};
use crate::shared::models::CType;

/// Outcome of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A byte that may be NUL was found
    Reachable,
    /// Every byte of the buffer is provably non-NUL or uninitialized
    Missing,
    /// Storage the scan cannot see into (unknown size, opaque, literal)
    Opaque,
    /// Scan budget exhausted before the end of the buffer
    Truncated,
}

impl Termination {
    pub fn is_acceptable(self) -> bool {
        self != Termination::Missing
    }
}

/// Decide whether the string `value` points to is terminated inside its buffer
pub fn scan_for_terminator(
    state: &ProgramState,
    svals: &SValBuilder,
    value: &SVal,
    max_elements: u64,
) -> Termination {
    let Some(region) = value.as_region() else {
        return Termination::Opaque;
    };
    let buffer = match region.kind() {
        RegionKind::Element { parent, .. } => parent.clone(),
        RegionKind::Symbolic { .. } | RegionKind::Heap { .. } | RegionKind::StringLiteral { .. } => {
            return Termination::Opaque
        }
        RegionKind::Var { ty, .. }
        | RegionKind::Param { ty, .. }
        | RegionKind::Field { ty, .. }
        | RegionKind::CompoundLiteral { ty, .. } => {
            if !ty.is_array() {
                return Termination::Missing;
            }
            region.clone()
        }
        // No string semantics at all; classified by the length lookup
        RegionKind::FunctionCode { .. }
        | RegionKind::BlockCode
        | RegionKind::BlockData
        | RegionKind::TempObject { .. } => return Termination::Opaque,
    };
    scan_buffer(state, svals, &buffer, max_elements)
}

fn scan_buffer(
    state: &ProgramState,
    svals: &SValBuilder,
    buffer: &Region,
    max_elements: u64,
) -> Termination {
    let count = state.element_count(buffer, &CType::Char);
    let Some(count) = state.known_value(&count) else {
        trace!("cstring: {} has no known size, not scanned", buffer);
        return Termination::Opaque;
    };
    let limit = count.min(i128::from(max_elements));

    for idx in 0..limit {
        let byte = state.get_sval(&Region::element(buffer, CType::Char, SVal::Int(idx)));
        if byte.is_unknown_or_undef() {
            continue;
        }
        let is_nul = svals.eval_eq(state, &byte, &SVal::Int(0));
        if state.assume(&is_nul, true).is_some() {
            trace!("cstring: {}[{}] may terminate the string", buffer, idx);
            return Termination::Reachable;
        }
    }

    if limit < count {
        trace!("cstring: scan of {} stopped after {} elements", buffer, limit);
        return Termination::Truncated;
    }
    Termination::Missing
}
