//! Build results

use std::path::PathBuf;

use crate::domain::value_objects::OutputArtifact;
use crate::error::CompileError;

/// Result of a full build
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Artifacts of transformed files
    pub compiled: Vec<OutputArtifact>,
    /// Copied static files, as destination paths
    pub copied: Vec<PathBuf>,
    /// Per-file failures; the rest of the batch still ran
    pub failed: Vec<CompileError>,
    /// Emitted files whose alias specifiers were rewritten
    pub aliased: usize,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Files written, compiled and copied
    pub fn written(&self) -> usize {
        self.compiled.len() + self.copied.len()
    }
}
