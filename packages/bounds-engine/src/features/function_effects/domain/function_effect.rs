//! Catalogue entries

use super::arg_set::ArgSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    /// Variadic: matches any argument count
    Any,
}

impl Arity {
    pub fn matches(&self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => *n == count,
            Arity::Any => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcatKind {
    /// `strcat`/`strncat`: the bound limits bytes appended
    Strcat,
    /// `strlcat`: the bound is the total destination size
    Strlcat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// `strchr`, `strrchr`
    Char,
    /// `strspn`, `strcspn`
    Span,
    /// `strstr`
    Substring,
    /// `strpbrk`
    Pbrk,
}

/// String-library modeling family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFamily {
    Length,
    Copy {
        /// Returns a pointer to the copied terminator (`stpcpy`)
        returns_end: bool,
        /// Returns the destination pointer rather than a length
        returns_ptr: bool,
    },
    Concat {
        kind: ConcatKind,
        returns_ptr: bool,
    },
    Compare {
        ignore_case: bool,
    },
    Search(SearchKind),
    Tokenize,
    Separate,
}

impl StringFamily {
    /// Phrase used in diagnostics
    pub fn description(&self) -> &'static str {
        match self {
            StringFamily::Length => "string length function",
            StringFamily::Copy { .. } => "string copy function",
            StringFamily::Concat { .. } => "string concatenation function",
            StringFamily::Compare { .. } => "string comparison function",
            StringFamily::Search(SearchKind::Char) => "strchr or strrchr function",
            StringFamily::Search(SearchKind::Span) => "strspn or strcspn function",
            StringFamily::Search(SearchKind::Substring) => "strstr() function",
            StringFamily::Search(SearchKind::Pbrk) => "strpbrk() function",
            StringFamily::Tokenize => "strtok() function",
            StringFamily::Separate => "strsep() function",
        }
    }
}

/// Argument roles of a string-library function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringModel {
    pub family: StringFamily,
    /// Buffer written by the call
    pub destination: Option<usize>,
    /// Strings read by the call, in argument order
    pub sources: &'static [usize],
    /// Size/count argument
    pub bound: Option<usize>,
}

impl StringModel {
    pub fn is_bounded(&self) -> bool {
        self.bound.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionEffect {
    pub name: &'static str,
    pub arity: Arity,
    pub reads: ArgSet,
    pub writes: ArgSet,
    /// Positions that must hold null-terminated strings
    pub string_reads: ArgSet,
    pub string_model: Option<StringModel>,
}
