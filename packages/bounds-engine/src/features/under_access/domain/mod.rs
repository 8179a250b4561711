pub mod access_kind;
pub mod raw_offset;

pub use access_kind::{AccessKind, UnderAccessFilter, BUG_CATEGORY, BUG_TYPE};
pub use raw_offset::RegionRawOffset;
