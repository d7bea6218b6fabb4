//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod alias_rewriter;
pub mod app_process;
pub mod file_system;
pub mod transpiler;
pub mod type_checker;

pub use alias_rewriter::AliasRewriter;
pub use app_process::{AppProcess, ExitSummary, SourceLoader};
pub use file_system::{FileSystem, FsError, FsResult};
pub use transpiler::{TransformError, TransformOutput, TransformRequest, Transpiler};
pub use type_checker::TypeChecker;
