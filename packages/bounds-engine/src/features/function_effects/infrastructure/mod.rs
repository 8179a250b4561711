//! Catalogue tables and lookup

pub mod catalogue;

pub use catalogue::{entries, lookup};
