//! Alias rewriter port
//!
//! Rewrites `paths` alias specifiers in emitted output to relative paths.
//! Works on files already written, so it must run after every write.

use std::path::Path;

use crate::domain::services::OutputLayout;
use crate::domain::value_objects::ProjectSettings;
use crate::error::CompileError;

pub trait AliasRewriter: Send + Sync {
    /// Rewrite every emitted script under the output directory.
    ///
    /// Returns the number of files changed.
    fn rewrite_dir(
        &self,
        settings: &ProjectSettings,
        layout: &OutputLayout,
    ) -> Result<usize, CompileError>;

    /// Rewrite a single emitted file. Returns whether it changed.
    fn rewrite_file(
        &self,
        emitted: &Path,
        settings: &ProjectSettings,
        layout: &OutputLayout,
    ) -> Result<bool, CompileError>;
}
