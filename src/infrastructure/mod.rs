//! Infrastructure Layer
//!
//! Concrete implementations of the domain ports:
//! - `fs` - local file system and project file discovery
//! - `process` - the supervised application and one-shot commands
//! - `tools` - `tsc`, `esbuild` and native alias rewriting

pub mod fs;
pub mod process;
pub mod tools;

pub use fs::{FileMatcher, FileSet, FileSetResolver, LocalFs};
pub use process::{ProcessSupervisor, RequireHooks};
pub use tools::{EsbuildTranspiler, PathAliasRewriter, TscTypeChecker};
