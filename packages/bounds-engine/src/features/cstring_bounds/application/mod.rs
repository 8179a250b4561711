pub mod compare_family;
pub mod copy_family;
pub mod cstring_checker;
pub mod length_family;
pub mod search_family;

pub use cstring_checker::CStringBoundsChecker;
