//! Catalogue domain types

pub mod arg_set;
pub mod function_effect;

pub use arg_set::ArgSet;
pub use function_effect::{
    Arity, ConcatKind, FunctionEffect, SearchKind, StringFamily, StringModel,
};
