//! File System Implementations
//!
//! Concrete implementations of the FileSystem port and project file discovery.

mod file_set;
mod local;

pub use file_set::{ExcludeSet, FileMatcher, FileSet, FileSetResolver, IncludeSet};
pub use local::LocalFs;
