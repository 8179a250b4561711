//! Memory regions
//!
//! Regions form a tree through the super-region relation (field-of,
//! element-of). Two regions denote the same storage iff they are equal
//! after [`Region::strip_casts`].

use std::fmt;
use std::sync::Arc;

use super::sval::SVal;
use super::symbol::Symbol;
use crate::shared::models::CType;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionKind {
    Var {
        decl: u32,
        name: String,
        ty: CType,
        global: bool,
    },
    Param {
        decl: u32,
        name: String,
        ty: CType,
    },
    Field {
        name: String,
        ty: CType,
        parent: Region,
    },
    Element {
        element_ty: CType,
        index: SVal,
        parent: Region,
    },
    /// Storage pointed to by an opaque pointer symbol
    Symbolic { symbol: Symbol },
    /// Literal contents, without the implicit terminator
    StringLiteral { id: u32, bytes: Vec<u8> },
    Heap { id: u32 },
    CompoundLiteral { id: u32, ty: CType },
    FunctionCode { name: Option<String> },
    BlockCode,
    BlockData,
    TempObject { ty: CType },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Region(Arc<RegionKind>);

impl Region {
    pub fn new(kind: RegionKind) -> Self {
        Region(Arc::new(kind))
    }

    pub fn var(decl: u32, name: impl Into<String>, ty: CType) -> Self {
        Self::new(RegionKind::Var {
            decl,
            name: name.into(),
            ty,
            global: false,
        })
    }

    pub fn global_var(decl: u32, name: impl Into<String>, ty: CType) -> Self {
        Self::new(RegionKind::Var {
            decl,
            name: name.into(),
            ty,
            global: true,
        })
    }

    pub fn param(decl: u32, name: impl Into<String>, ty: CType) -> Self {
        Self::new(RegionKind::Param {
            decl,
            name: name.into(),
            ty,
        })
    }

    pub fn field(parent: &Region, name: impl Into<String>, ty: CType) -> Self {
        Self::new(RegionKind::Field {
            name: name.into(),
            ty,
            parent: parent.clone(),
        })
    }

    pub fn element(parent: &Region, element_ty: CType, index: SVal) -> Self {
        Self::new(RegionKind::Element {
            element_ty,
            index,
            parent: parent.clone(),
        })
    }

    pub fn symbolic(symbol: Symbol) -> Self {
        Self::new(RegionKind::Symbolic { symbol })
    }

    pub fn string_literal(id: u32, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(RegionKind::StringLiteral {
            id,
            bytes: bytes.into(),
        })
    }

    pub fn kind(&self) -> &RegionKind {
        &self.0
    }

    /// Super region for fields and elements
    pub fn parent(&self) -> Option<&Region> {
        match self.kind() {
            RegionKind::Field { parent, .. } | RegionKind::Element { parent, .. } => Some(parent),
            _ => None,
        }
    }

    /// Strict ancestors, nearest first
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            next: self.parent(),
        }
    }

    pub fn is_sub_region_of(&self, other: &Region) -> bool {
        self.ancestors().any(|ancestor| ancestor == other)
    }

    /// Peel zero-index element layers (pointer casts of the same storage)
    pub fn strip_casts(&self) -> Region {
        let mut region = self;
        while let RegionKind::Element { index, parent, .. } = region.kind() {
            if index.as_int() != Some(0) {
                break;
            }
            region = parent;
        }
        region.clone()
    }

    pub fn base_region(&self) -> &Region {
        let mut region = self;
        while let Some(parent) = region.parent() {
            region = parent;
        }
        region
    }

    /// Pointer symbol the storage hangs off, if any
    pub fn symbolic_base(&self) -> Option<&Symbol> {
        match self.base_region().kind() {
            RegionKind::Symbolic { symbol } => Some(symbol),
            _ => None,
        }
    }

    pub fn value_type(&self) -> Option<CType> {
        match self.kind() {
            RegionKind::Var { ty, .. }
            | RegionKind::Param { ty, .. }
            | RegionKind::Field { ty, .. }
            | RegionKind::CompoundLiteral { ty, .. }
            | RegionKind::TempObject { ty } => Some(ty.clone()),
            RegionKind::Element { element_ty, .. } => Some(element_ty.clone()),
            // Storage a pointer symbol points to
            RegionKind::Symbolic { symbol } => symbol.ty().element_type().cloned(),
            RegionKind::StringLiteral { bytes, .. } => {
                Some(CType::array(CType::Char, bytes.len() as u64 + 1))
            }
            _ => None,
        }
    }

    /// Literal contents when this is a string literal region
    pub fn literal_bytes(&self) -> Option<&[u8]> {
        match self.kind() {
            RegionKind::StringLiteral { bytes, .. } => Some(bytes),
            _ => None,
        }
    }

    /// Kinds with a stable identity that may carry per-region facts
    pub fn has_trackable_identity(&self) -> bool {
        matches!(
            self.kind(),
            RegionKind::Var { .. }
                | RegionKind::Param { .. }
                | RegionKind::Field { .. }
                | RegionKind::Symbolic { .. }
                | RegionKind::Heap { .. }
        )
    }

    /// Storage whose contents the analysis cannot see through
    pub fn is_opaque(&self) -> bool {
        matches!(
            self.kind(),
            RegionKind::Symbolic { .. } | RegionKind::Heap { .. }
        )
    }

    /// Uninitialized until written (non-global variables)
    pub(crate) fn starts_undefined(&self) -> bool {
        matches!(self.base_region().kind(), RegionKind::Var { global: false, .. })
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            RegionKind::Var { name, .. } | RegionKind::Param { name, .. } => f.write_str(name),
            RegionKind::Field { name, parent, .. } => write!(f, "{}.{}", parent, name),
            RegionKind::Element { index, parent, .. } => write!(f, "{}[{}]", parent, index),
            RegionKind::Symbolic { symbol } => write!(f, "SymRegion{{{}}}", symbol),
            RegionKind::StringLiteral { bytes, .. } => {
                write!(f, "\"{}\"", String::from_utf8_lossy(bytes).escape_default())
            }
            RegionKind::Heap { id } => write!(f, "HeapRegion{{{}}}", id),
            RegionKind::CompoundLiteral { id, .. } => write!(f, "CompoundLiteral{{{}}}", id),
            RegionKind::FunctionCode { name } => {
                write!(f, "code{{{}}}", name.as_deref().unwrap_or("<anonymous>"))
            }
            RegionKind::BlockCode => f.write_str("block_code"),
            RegionKind::BlockData => f.write_str("block_data"),
            RegionKind::TempObject { ty } => write!(f, "temp{{{}}}", ty),
        }
    }
}

/// Iterator over strict ancestors
pub struct Ancestors<'a> {
    next: Option<&'a Region>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Region;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}
