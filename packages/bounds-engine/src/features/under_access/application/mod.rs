pub mod under_access_checker;

pub use under_access_checker::BufferUnderAccessChecker;
