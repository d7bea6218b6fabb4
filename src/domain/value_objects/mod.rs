//! Domain Value Objects
//!
//! Immutable value types shared by every layer.

mod diagnostic;
mod hash;
mod settings;
mod source_file;

pub use diagnostic::{Diagnostic, Severity};
pub use hash::ContentHash;
pub use settings::{CompileFlags, ProjectSettings, SourceMapMode};
pub use source_file::{
    FileKind, OutputArtifact, SourceFile, COMPILABLE_EXTENSIONS, DECLARATION_SUFFIXES,
};
