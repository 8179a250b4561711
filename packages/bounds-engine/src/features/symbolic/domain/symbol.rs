//! Symbols and symbolic expressions
//!
//! A [`Symbol`] stands for an unknown quantity. Identity is structural:
//! conjured and metadata symbols carry a per-run id, region-value and
//! derived symbols are identified by the region they describe.

use std::fmt;
use std::sync::Arc;

use super::region::Region;
use crate::shared::models::CType;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolOrigin {
    /// Fresh value, e.g. a call result or invalidated contents
    Conjured { tag: String },
    /// Initial contents of a region the analysis did not see written
    RegionValue { region: Region },
    /// Contents of `region` inside a cluster whose default binding is `parent`
    Derived { parent: Symbol, region: Region },
    /// Checker-owned quantity attached to a region
    Metadata { region: Region, tag: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct SymbolData {
    id: u32,
    ty: CType,
    origin: SymbolOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<SymbolData>);

impl Symbol {
    pub(crate) fn new(id: u32, ty: CType, origin: SymbolOrigin) -> Self {
        Symbol(Arc::new(SymbolData { id, ty, origin }))
    }

    pub fn region_value(region: Region, ty: CType) -> Self {
        Self::new(0, ty, SymbolOrigin::RegionValue { region })
    }

    pub fn derived(parent: &Symbol, region: Region, ty: CType) -> Self {
        Self::new(
            0,
            ty,
            SymbolOrigin::Derived {
                parent: parent.clone(),
                region,
            },
        )
    }

    pub fn id(&self) -> u32 {
        self.0.id
    }

    pub fn ty(&self) -> &CType {
        &self.0.ty
    }

    pub fn origin(&self) -> &SymbolOrigin {
        &self.0.origin
    }

    /// Region a metadata symbol is attached to
    pub fn metadata_region(&self) -> Option<&Region> {
        match &self.0.origin {
            SymbolOrigin::Metadata { region, .. } => Some(region),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.origin {
            SymbolOrigin::Conjured { tag } => write!(f, "conj_${}{{{}}}", self.0.id, tag),
            SymbolOrigin::RegionValue { region } => write!(f, "reg_${{{}}}", region),
            SymbolOrigin::Derived { parent, region } => write!(f, "derived_{{{},{}}}", parent, region),
            SymbolOrigin::Metadata { region, tag } => {
                write!(f, "meta_${}{{{},{}}}", self.0.id, region, tag)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge | BinaryOp::Eq | BinaryOp::Ne
        )
    }

    pub fn is_commutative(self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Mul | BinaryOp::Eq | BinaryOp::Ne)
    }

    /// `!(a op b)` == `a op.negate() b`
    pub fn negate(self) -> Self {
        match self {
            BinaryOp::Lt => BinaryOp::Ge,
            BinaryOp::Ge => BinaryOp::Lt,
            BinaryOp::Gt => BinaryOp::Le,
            BinaryOp::Le => BinaryOp::Gt,
            BinaryOp::Eq => BinaryOp::Ne,
            BinaryOp::Ne => BinaryOp::Eq,
            other => other,
        }
    }

    /// `a op b` == `b op.swap() a`
    pub fn swap(self) -> Self {
        match self {
            BinaryOp::Lt => BinaryOp::Gt,
            BinaryOp::Gt => BinaryOp::Lt,
            BinaryOp::Le => BinaryOp::Ge,
            BinaryOp::Ge => BinaryOp::Le,
            other => other,
        }
    }

    /// Evaluate on concrete operands; `None` on division by zero or overflow
    pub fn eval(self, lhs: i128, rhs: i128) -> Option<i128> {
        match self {
            BinaryOp::Add => lhs.checked_add(rhs),
            BinaryOp::Sub => lhs.checked_sub(rhs),
            BinaryOp::Mul => lhs.checked_mul(rhs),
            BinaryOp::Div => lhs.checked_div(rhs),
            BinaryOp::Rem => lhs.checked_rem(rhs),
            BinaryOp::Lt => Some((lhs < rhs) as i128),
            BinaryOp::Gt => Some((lhs > rhs) as i128),
            BinaryOp::Le => Some((lhs <= rhs) as i128),
            BinaryOp::Ge => Some((lhs >= rhs) as i128),
            BinaryOp::Eq => Some((lhs == rhs) as i128),
            BinaryOp::Ne => Some((lhs != rhs) as i128),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
        }
    }
}

/// Symbolic expression tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymExpr {
    Atom(Symbol),
    Int(i128),
    Binary {
        op: BinaryOp,
        lhs: Box<SymExpr>,
        rhs: Box<SymExpr>,
    },
}

impl SymExpr {
    pub fn binary(op: BinaryOp, lhs: SymExpr, rhs: SymExpr) -> Self {
        SymExpr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            SymExpr::Atom(sym) => Some(sym),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            SymExpr::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Every symbol leaf, left to right
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut out = Vec::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut Vec<Symbol>) {
        match self {
            SymExpr::Atom(sym) => out.push(sym.clone()),
            SymExpr::Int(_) => {}
            SymExpr::Binary { lhs, rhs, .. } => {
                lhs.collect_symbols(out);
                rhs.collect_symbols(out);
            }
        }
    }
}

impl fmt::Display for SymExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymExpr::Atom(sym) => write!(f, "{}", sym),
            SymExpr::Int(v) => write!(f, "{}", v),
            SymExpr::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
        }
    }
}
