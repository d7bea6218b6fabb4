//! Type-check gate
//!
//! Decides whether a compile may proceed. Never touches the filesystem.

use std::path::{Path, PathBuf};

use crate::domain::ports::TypeChecker;
use crate::domain::value_objects::{Diagnostic, ProjectSettings, Severity};
use crate::ui::Logger;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeCheckOutcome {
    Pass,
    /// Every diagnostic reported, errors and warnings alike
    Fail(Vec<Diagnostic>),
}

impl TypeCheckOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, TypeCheckOutcome::Pass)
    }
}

pub struct TypeCheckGate<C: TypeChecker> {
    checker: C,
    settings: ProjectSettings,
    logger: Logger,
}

impl<C: TypeChecker> TypeCheckGate<C> {
    pub fn new(checker: C, settings: ProjectSettings, logger: Logger) -> Self {
        Self {
            checker,
            settings,
            logger,
        }
    }

    /// Pass only when the checker reports nothing; a warning fails too.
    ///
    /// A checker that cannot run counts as a failure with one global diagnostic.
    pub fn check(&self, files: &[PathBuf]) -> TypeCheckOutcome {
        let timer = self.logger.timer("type checking...");

        let diagnostics = match self.checker.diagnose(files, &self.settings) {
            Ok(diagnostics) => diagnostics,
            Err(message) => vec![Diagnostic::global(Severity::Error, message)],
        };

        if !diagnostics.is_empty() {
            self.logger.diagnostics(&diagnostics);
            self.logger.error(format!(
                "type check failed with {} diagnostic(s)",
                diagnostics.len()
            ));
            return TypeCheckOutcome::Fail(diagnostics);
        }

        timer.end("type check passed");
        TypeCheckOutcome::Pass
    }

    pub fn checker(&self) -> &C {
        &self.checker
    }

    pub fn check_one(&self, file: &Path) -> TypeCheckOutcome {
        self.check(&[file.to_path_buf()])
    }
}
