pub mod offset_simplifier;

pub use offset_simplifier::simplify_offsets;
