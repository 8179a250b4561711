//! Pipeline orchestration
//!
//! Configuration in, configured checker driver out.

pub mod checker_registry;

pub use checker_registry::CheckerRegistry;
