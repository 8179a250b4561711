//! Call events

use crate::features::symbolic::SVal;
use crate::shared::models::{CType, ExprId, Span};

/// One evaluated call argument
#[derive(Debug, Clone, PartialEq)]
pub struct CallArg {
    pub expr: ExprId,
    pub ty: CType,
    pub value: SVal,
    pub span: Span,
}

impl CallArg {
    pub fn new(expr: ExprId, ty: CType, value: SVal, span: Span) -> Self {
        Self {
            expr,
            ty,
            value,
            span,
        }
    }
}

/// A call site reached on some path, with its arguments already evaluated
#[derive(Debug, Clone, PartialEq)]
pub struct CallEvent {
    pub expr: ExprId,
    pub callee: String,
    pub args: Vec<CallArg>,
    pub return_ty: CType,
    pub span: Span,
}

impl CallEvent {
    pub fn new(expr: ExprId, callee: impl Into<String>, return_ty: CType, span: Span) -> Self {
        Self {
            expr,
            callee: callee.into(),
            args: Vec::new(),
            return_ty,
            span,
        }
    }

    pub fn with_arg(mut self, arg: CallArg) -> Self {
        self.args.push(arg);
        self
    }

    pub fn arg(&self, idx: usize) -> Option<&CallArg> {
        self.args.get(idx)
    }

    pub fn num_args(&self) -> usize {
        self.args.len()
    }

    /// Every argument is integral, an enum, or a pointer
    pub fn has_scalar_args(&self) -> bool {
        self.args
            .iter()
            .all(|arg| arg.ty.is_integral_or_enum() || arg.ty.is_pointer())
    }
}
