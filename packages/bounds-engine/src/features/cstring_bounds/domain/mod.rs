pub mod length_facts;
pub mod messages;

pub use length_facts::{forget_changed, recorded_length, set_length, LENGTH_MAP, LENGTH_TAG};
