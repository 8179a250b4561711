//! Symbolic infrastructure: state store, constraints, value builder

mod constraint_manager;
pub mod program_state;
pub mod sval_builder;
pub mod symbol_reaper;

pub use program_state::{InvalidationTraits, ProgramState};
pub use sval_builder::SValBuilder;
pub use symbol_reaper::SymbolReaper;
