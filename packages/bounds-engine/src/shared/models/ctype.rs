//! C types as seen by the checkers
//!
//! Only the facts the engines need are modeled: byte sizes (LP64),
//! value ranges and the integral/pointer predicates of the call guard.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte width of pointers and `size_t` (LP64)
pub const POINTER_WIDTH: u64 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CType {
    Void,
    Bool,
    Char,
    UChar,
    Short,
    Int,
    UInt,
    Long,
    ULong,
    SizeT,
    Enum(String),
    Pointer(Box<CType>),
    Array(Box<CType>, u64),
    IncompleteArray(Box<CType>),
    Record { name: String, size: u64 },
    Function(String),
}

impl CType {
    pub fn pointer(pointee: CType) -> Self {
        CType::Pointer(Box::new(pointee))
    }

    pub fn array(element: CType, len: u64) -> Self {
        CType::Array(Box::new(element), len)
    }

    /// `char *`
    pub fn char_ptr() -> Self {
        Self::pointer(CType::Char)
    }

    /// Size in bytes, `None` for incomplete types
    pub fn size_in_bytes(&self) -> Option<u64> {
        match self {
            CType::Void | CType::IncompleteArray(_) | CType::Function(_) => None,
            CType::Bool | CType::Char | CType::UChar => Some(1),
            CType::Short => Some(2),
            CType::Int | CType::UInt | CType::Enum(_) => Some(4),
            CType::Long | CType::ULong | CType::SizeT | CType::Pointer(_) => Some(POINTER_WIDTH),
            CType::Array(element, len) => element.size_in_bytes().map(|size| size * len),
            CType::Record { size, .. } => Some(*size),
        }
    }

    pub fn is_incomplete(&self) -> bool {
        self.size_in_bytes().is_none()
    }

    pub fn is_integral_or_enum(&self) -> bool {
        matches!(
            self,
            CType::Bool
                | CType::Char
                | CType::UChar
                | CType::Short
                | CType::Int
                | CType::UInt
                | CType::Long
                | CType::ULong
                | CType::SizeT
                | CType::Enum(_)
        )
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, CType::Pointer(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, CType::Array(..) | CType::IncompleteArray(_))
    }

    pub fn is_char(&self) -> bool {
        matches!(self, CType::Char | CType::UChar)
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            CType::Bool | CType::UChar | CType::UInt | CType::ULong | CType::SizeT | CType::Pointer(_)
        )
    }

    /// Element type of arrays, pointee of pointers
    pub fn element_type(&self) -> Option<&CType> {
        match self {
            CType::Array(element, _) | CType::IncompleteArray(element) | CType::Pointer(element) => {
                Some(element)
            }
            _ => None,
        }
    }

    /// Inclusive range of values representable by this type
    pub fn value_range(&self) -> (i128, i128) {
        match self {
            CType::Bool => (0, 1),
            CType::Char => (i8::MIN as i128, i8::MAX as i128),
            CType::UChar => (0, u8::MAX as i128),
            CType::Short => (i16::MIN as i128, i16::MAX as i128),
            CType::Int | CType::Enum(_) => (i32::MIN as i128, i32::MAX as i128),
            CType::UInt => (0, u32::MAX as i128),
            CType::ULong | CType::SizeT | CType::Pointer(_) => (0, u64::MAX as i128),
            _ => (i64::MIN as i128, i64::MAX as i128),
        }
    }

    /// Largest value of the type
    pub fn max_value(&self) -> i128 {
        self.value_range().1
    }
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CType::Void => write!(f, "void"),
            CType::Bool => write!(f, "_Bool"),
            CType::Char => write!(f, "char"),
            CType::UChar => write!(f, "unsigned char"),
            CType::Short => write!(f, "short"),
            CType::Int => write!(f, "int"),
            CType::UInt => write!(f, "unsigned int"),
            CType::Long => write!(f, "long"),
            CType::ULong => write!(f, "unsigned long"),
            CType::SizeT => write!(f, "size_t"),
            CType::Enum(name) => write!(f, "enum {}", name),
            CType::Pointer(pointee) => write!(f, "{} *", pointee),
            CType::Array(element, len) => write!(f, "{}[{}]", element, len),
            CType::IncompleteArray(element) => write!(f, "{}[]", element),
            CType::Record { name, .. } => write!(f, "struct {}", name),
            CType::Function(name) => write!(f, "{}()", name),
        }
    }
}
