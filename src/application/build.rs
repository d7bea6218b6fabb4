//! Build Use Case
//!
//! Type check (unless transpile-only), then a full clean build.

use std::path::PathBuf;

use crate::domain::ports::{FileSystem, Transpiler, TypeChecker};
use crate::domain::value_objects::{Diagnostic, SourceFile};
use crate::error::CompileError;
use crate::infrastructure::fs::FileSet;

use super::compile::{BuildReport, CompileEngine};
use super::type_check::{TypeCheckGate, TypeCheckOutcome};

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Restrict compilation to these files; static files are still copied
    pub files: Vec<PathBuf>,
    pub transpile_only: bool,
}

#[derive(Debug)]
pub enum BuildOutcome {
    /// The type check failed; nothing was written
    TypeCheckFailed(Vec<Diagnostic>),
    Built(BuildReport),
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            BuildOutcome::TypeCheckFailed(_) => false,
            BuildOutcome::Built(report) => report.is_success(),
        }
    }
}

pub struct BuildUseCase<'a, C, T, FS>
where
    C: TypeChecker,
    T: Transpiler,
    FS: FileSystem,
{
    gate: &'a TypeCheckGate<C>,
    engine: &'a CompileEngine<T, FS>,
}

impl<'a, C, T, FS> BuildUseCase<'a, C, T, FS>
where
    C: TypeChecker,
    T: Transpiler,
    FS: FileSystem,
{
    pub fn new(gate: &'a TypeCheckGate<C>, engine: &'a CompileEngine<T, FS>) -> Self {
        Self { gate, engine }
    }

    pub fn execute(
        &self,
        resolved: FileSet,
        options: &BuildOptions,
    ) -> Result<BuildOutcome, CompileError> {
        let files = select(resolved, &options.files);

        if !options.transpile_only {
            if let TypeCheckOutcome::Fail(diagnostics) = self.gate.check(&files.compile_paths()) {
                return Ok(BuildOutcome::TypeCheckFailed(diagnostics));
            }
        }

        self.engine.build_all(&files).map(BuildOutcome::Built)
    }
}

/// Replace the compile set with `explicit` when given.
fn select(resolved: FileSet, explicit: &[PathBuf]) -> FileSet {
    if explicit.is_empty() {
        return resolved;
    }
    let mut compile: Vec<SourceFile> = explicit
        .iter()
        .map(|path| SourceFile::new(path.clone()))
        .filter(SourceFile::is_compilable)
        .collect();
    compile.sort_by(|a, b| a.path().cmp(b.path()));
    compile.dedup();
    FileSet {
        compile,
        copy: resolved.copy,
    }
}
