pub mod buffer_invalidation;
pub mod copy_amount;
pub mod literal_compare;
pub mod terminator_scan;

pub use buffer_invalidation::{buffer_region, invalidate_buffer};
pub use copy_amount::{select_amount_copied, select_strlcat_amount};
pub use literal_compare::compare_literals;
pub use terminator_scan::{scan_for_terminator, Termination};
