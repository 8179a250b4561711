//! C string bounds checking (MISRA C:2012 Rule 21.17)
//!
//! Architecture:
//! - domain: string-length facts and report texts
//! - infrastructure: terminator scan, buffer invalidation, copy amounts,
//!   literal comparison
//! - application: the [`CStringBoundsChecker`] hooks, one module per
//!   function family

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::CStringBoundsChecker;
pub use domain::{recorded_length, LENGTH_MAP};
pub use infrastructure::{select_amount_copied, select_strlcat_amount, Termination};
