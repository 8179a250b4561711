//! Expression identity

use serde::{Deserialize, Serialize};

/// Identity of an expression in the analyzed program.
///
/// The host assigns these; the engines only use them to bind call results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExprId(pub u32);

impl std::fmt::Display for ExprId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "expr#{}", self.0)
    }
}
