//! Symbolic execution substrate
//!
//! The capability layer the checkers call into: regions, symbolic values,
//! persistent program states with a range-based constraint store, and the
//! value builder. It is deliberately small; the checkers only need a fixed
//! vocabulary of region kinds and comparison constraints.
//!
//! # Example
//!
//! ```
//! use bounds_engine::features::symbolic::{BinaryOp, ProgramState, SVal, SValBuilder};
//! use bounds_engine::shared::models::CType;
//!
//! let svals = SValBuilder::new();
//! let state = ProgramState::new();
//! let n = svals.conjure_sval("n", CType::Int);
//! let is_zero = svals.eval_binop(&state, BinaryOp::Eq, &n, &SVal::Int(0));
//! let (zero, nonzero) = state.assume_dual(&is_zero);
//! assert!(zero.is_some() && nonzero.is_some());
//! ```

pub mod domain;
pub mod infrastructure;

pub use domain::*;
pub use infrastructure::*;
