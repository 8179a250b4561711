//! Test data builders

use bounds_engine::features::checker_api::{CallArg, CallEvent};
use bounds_engine::features::symbolic::SVal;
use bounds_engine::shared::models::{CType, ExprId, Span};

/// Builder for call events; argument expression ids follow the call's own
#[derive(Debug)]
pub struct CallBuilder {
    call: CallEvent,
    next_expr: u32,
}

impl CallBuilder {
    pub fn new(expr: u32, callee: &str) -> Self {
        let return_ty = match callee {
            "strlen" | "strnlen" | "strspn" | "strcspn" | "strlcpy" | "strlcat" => CType::SizeT,
            "strcmp" | "strncmp" | "strcasecmp" | "strncasecmp" | "strcoll" => CType::Int,
            _ => CType::char_ptr(),
        };
        Self {
            call: CallEvent::new(ExprId(expr), callee, return_ty, Span::line(expr, 4, 40)),
            next_expr: expr * 10,
        }
    }

    pub fn at(mut self, span: Span) -> Self {
        self.call.span = span;
        self
    }

    /// Pointer argument (`char *`)
    pub fn ptr(self, value: SVal) -> Self {
        self.arg(CType::char_ptr(), value)
    }

    /// Size argument (`size_t`)
    pub fn size(self, value: SVal) -> Self {
        self.arg(CType::SizeT, value)
    }

    pub fn arg(mut self, ty: CType, value: SVal) -> Self {
        self.next_expr += 1;
        let arg = CallArg::new(ExprId(self.next_expr), ty, value, Span::zero());
        self.call = self.call.with_arg(arg);
        self
    }

    pub fn build(self) -> CallEvent {
        self.call
    }
}
