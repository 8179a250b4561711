//! Symbolic values

use std::fmt;

use super::region::Region;
use super::symbol::{SymExpr, Symbol};

/// Location values
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Loc {
    Region(Region),
    /// The null pointer constant
    Null,
    /// Address of a `goto` label
    Label(String),
}

/// Abstract runtime value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SVal {
    Undefined,
    Unknown,
    Int(i128),
    Sym(SymExpr),
    Loc(Loc),
}

impl SVal {
    pub fn region(region: Region) -> Self {
        SVal::Loc(Loc::Region(region))
    }

    pub fn symbol(sym: Symbol) -> Self {
        SVal::Sym(SymExpr::Atom(sym))
    }

    pub fn null() -> Self {
        SVal::Loc(Loc::Null)
    }

    /// Wrap an expression, collapsing bare integers
    pub fn from_expr(expr: SymExpr) -> Self {
        match expr {
            SymExpr::Int(v) => SVal::Int(v),
            other => SVal::Sym(other),
        }
    }

    pub fn is_undef(&self) -> bool {
        matches!(self, SVal::Undefined)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, SVal::Unknown)
    }

    pub fn is_unknown_or_undef(&self) -> bool {
        matches!(self, SVal::Unknown | SVal::Undefined)
    }

    /// Integer-valued (concrete or symbolic)
    pub fn is_nonloc(&self) -> bool {
        matches!(self, SVal::Int(_) | SVal::Sym(_))
    }

    pub fn is_loc(&self) -> bool {
        matches!(self, SVal::Loc(_))
    }

    pub fn as_region(&self) -> Option<&Region> {
        match self {
            SVal::Loc(Loc::Region(region)) => Some(region),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            SVal::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The symbol when this value is exactly one symbol
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            SVal::Sym(expr) => expr.as_symbol(),
            _ => None,
        }
    }

    pub fn as_expr(&self) -> Option<SymExpr> {
        match self {
            SVal::Int(v) => Some(SymExpr::Int(*v)),
            SVal::Sym(expr) => Some(expr.clone()),
            _ => None,
        }
    }

    /// Symbols this value depends on
    pub fn symbols(&self) -> Vec<Symbol> {
        match self {
            SVal::Sym(expr) => expr.symbols(),
            SVal::Loc(Loc::Region(region)) => region.symbolic_base().into_iter().cloned().collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_zero_constant(&self) -> bool {
        matches!(self, SVal::Int(0) | SVal::Loc(Loc::Null))
    }
}

impl fmt::Display for SVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SVal::Undefined => write!(f, "Undefined"),
            SVal::Unknown => write!(f, "Unknown"),
            SVal::Int(v) => write!(f, "{}", v),
            SVal::Sym(expr) => write!(f, "{}", expr),
            SVal::Loc(Loc::Region(region)) => write!(f, "&{}", region),
            SVal::Loc(Loc::Null) => write!(f, "NULL"),
            SVal::Loc(Loc::Label(name)) => write!(f, "&&{}", name),
        }
    }
}
