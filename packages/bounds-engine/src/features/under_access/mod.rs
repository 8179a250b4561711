//! Buffer under-access detection (CWE-124 underwrite, CWE-127 underread)
//!
//! Architecture:
//! - domain: access directions, filter, raw byte offsets
//! - infrastructure: offset/extent simplification
//! - application: the [`BufferUnderAccessChecker`] hooks

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::BufferUnderAccessChecker;
pub use domain::{AccessKind, RegionRawOffset, UnderAccessFilter};
