//! Raw byte offsets
//!
//! A location `base[i][j]` sits `j * sizeof(elem) + i * sizeof(row)` bytes
//! past the start of `base`. The offset is computed on demand and never
//! stored in the program state.

use crate::features::symbolic::{BinaryOp, ProgramState, Region, RegionKind, SVal, SValBuilder};

#[derive(Debug, Clone, PartialEq)]
pub struct RegionRawOffset {
    base: Region,
    byte_offset: SVal,
}

impl RegionRawOffset {
    pub fn new(base: Region, byte_offset: SVal) -> Self {
        Self { base, byte_offset }
    }

    /// First non-element region under the location
    pub fn base(&self) -> &Region {
        &self.base
    }

    pub fn byte_offset(&self) -> &SVal {
        &self.byte_offset
    }

    /// Decompose `location` into base region plus byte offset.
    ///
    /// `None` unless the location is an element access whose index and
    /// element sizes are all known enough to form an offset expression.
    pub fn compute(state: &ProgramState, location: &SVal) -> Option<Self> {
        let mut region = location.as_region()?;
        let mut offset: Option<SVal> = None;

        while let RegionKind::Element {
            element_ty,
            index,
            parent,
        } = region.kind()
        {
            if !index.is_nonloc() {
                return None;
            }
            let size = element_ty.size_in_bytes()?;
            let scaled =
                SValBuilder::fold_binop(state, BinaryOp::Mul, index, &SVal::Int(size as i128));
            let total = match offset {
                Some(previous) => SValBuilder::fold_binop(state, BinaryOp::Add, &previous, &scaled),
                None => scaled,
            };
            if total.is_unknown_or_undef() {
                return None;
            }
            offset = Some(total);
            region = parent;
        }

        offset.map(|byte_offset| Self::new(region.clone(), byte_offset))
    }
}
