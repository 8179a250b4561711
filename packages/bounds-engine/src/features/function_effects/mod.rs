//! Function effect catalogue
//!
//! Static knowledge about C library functions: which argument positions
//! are read, which are written, which must hold null-terminated strings,
//! and (for string functions) which modeling family applies.
//!
//! The table is immutable and process-wide; lookups are by
//! `(name, arity)` with `__builtin_` spellings folded onto their plain names.

pub mod domain;
pub mod infrastructure;

pub use domain::*;
pub use infrastructure::*;
