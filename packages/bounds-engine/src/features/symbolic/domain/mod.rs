//! Symbolic domain: values, regions, ranges

pub mod range_set;
pub mod region;
pub mod sval;
pub mod symbol;

pub use range_set::RangeSet;
pub use region::{Region, RegionKind};
pub use sval::{Loc, SVal};
pub use symbol::{BinaryOp, SymExpr, Symbol, SymbolOrigin};
