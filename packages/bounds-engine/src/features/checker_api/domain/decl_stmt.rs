//! Declaration events

use crate::features::symbolic::{Region, SVal};
use crate::shared::models::{CType, ExprId, Span};

#[derive(Debug, Clone, PartialEq)]
pub enum Initializer {
    /// Initialized from a string literal; `value` points at the literal
    StringLiteral { expr: ExprId, value: SVal },
    Expr { expr: ExprId, value: SVal },
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub ty: CType,
    /// Storage of the declared variable
    pub region: Region,
    pub init: Option<Initializer>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclStmt {
    pub decls: Vec<VarDecl>,
    pub span: Span,
}

impl DeclStmt {
    pub fn single(decl: VarDecl, span: Span) -> Self {
        Self {
            decls: vec![decl],
            span,
        }
    }
}
