//! Access directions and their reports

use crate::config::{CHECKER_UNDERREAD, CHECKER_UNDERWRITE};
use crate::shared::models::DiagnosticCategory;

pub const BUG_TYPE: &str = "Buffer UnderAccess";
pub const BUG_CATEGORY: &str = "Out-of-bounds Access Error";

const MSG_NEG_WRITE: &str =
    "Try to write to memory that may be prior to beginning of the buffer.(CWE-124: Buffer Underwrite)";
const MSG_NEG_READ: &str =
    "Try to read memory that may be prior to beginning of the buffer.(CWE-127: Buffer Underread)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    Read,
    Write,
}

impl AccessKind {
    pub fn from_is_load(is_load: bool) -> Self {
        if is_load {
            AccessKind::Read
        } else {
            AccessKind::Write
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            AccessKind::Read => MSG_NEG_READ,
            AccessKind::Write => MSG_NEG_WRITE,
        }
    }

    pub fn category(self) -> DiagnosticCategory {
        match self {
            AccessKind::Read => DiagnosticCategory::BufferUnderread,
            AccessKind::Write => DiagnosticCategory::BufferUnderwrite,
        }
    }

    /// Rule reported for this direction
    pub fn checker_name(self) -> &'static str {
        match self {
            AccessKind::Read => CHECKER_UNDERREAD,
            AccessKind::Write => CHECKER_UNDERWRITE,
        }
    }
}

/// Which directions are checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnderAccessFilter {
    pub check_underread: bool,
    pub check_underwrite: bool,
}

impl UnderAccessFilter {
    pub fn all() -> Self {
        Self {
            check_underread: true,
            check_underwrite: true,
        }
    }

    pub fn enable(&mut self, kind: AccessKind) {
        match kind {
            AccessKind::Read => self.check_underread = true,
            AccessKind::Write => self.check_underwrite = true,
        }
    }

    pub fn checks(&self, kind: AccessKind) -> bool {
        match kind {
            AccessKind::Read => self.check_underread,
            AccessKind::Write => self.check_underwrite,
        }
    }
}
