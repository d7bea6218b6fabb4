//! Type checker port
//!
//! Side-effect free: collects pre-emit diagnostics for a set of files.

use std::path::PathBuf;

use crate::domain::value_objects::{Diagnostic, ProjectSettings};

pub trait TypeChecker {
    /// Diagnose `files` with the project's compiler options.
    ///
    /// `Err` means the checker could not run at all; the message is shown
    /// to the user in place of diagnostics.
    fn diagnose(&self, files: &[PathBuf], settings: &ProjectSettings)
        -> Result<Vec<Diagnostic>, String>;
}
