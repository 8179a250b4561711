//! Shared models

mod ctype;
mod diagnostic;
mod expr_id;
mod span;

pub use ctype::CType;
pub use diagnostic::{Diagnostic, DiagnosticCategory};
pub use expr_id::ExprId;
pub use span::Span;
