//! Events delivered to checkers

pub mod call_event;
pub mod decl_stmt;

pub use call_event::{CallArg, CallEvent};
pub use decl_stmt::{DeclStmt, Initializer, VarDecl};
