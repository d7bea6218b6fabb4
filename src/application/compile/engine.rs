//! Compile engine
//!
//! Full builds run in four steps:
//! 1. Clean the output directory (barrier)
//! 2. Copy static files
//! 3. Transform compilable files
//! 4. Rewrite path aliases in the emitted files (barrier)
//!
//! Steps 2 and 3 run on a rayon pool. A failing file never aborts the batch
//! unless fail-fast is on.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::domain::ports::{AliasRewriter, FileSystem, TransformRequest, Transpiler};
use crate::domain::services::{relative_to, OutputLayout};
use crate::domain::value_objects::{FileKind, OutputArtifact, ProjectSettings, SourceFile};
use crate::error::CompileError;
use crate::infrastructure::fs::FileSet;
use crate::ui::Logger;

use super::report::BuildReport;

/// What happened to one source file
enum Outcome {
    Compiled(OutputArtifact),
    Copied(PathBuf),
    Skipped,
}

pub struct CompileEngine<T, FS>
where
    T: Transpiler,
    FS: FileSystem,
{
    transpiler: T,
    file_system: FS,
    aliases: Option<Box<dyn AliasRewriter>>,
    settings: ProjectSettings,
    layout: OutputLayout,
    logger: Logger,
    fail_fast: bool,
    pool: Option<rayon::ThreadPool>,
}

impl<T, FS> CompileEngine<T, FS>
where
    T: Transpiler,
    FS: FileSystem,
{
    pub fn new(
        transpiler: T,
        file_system: FS,
        settings: ProjectSettings,
        layout: OutputLayout,
        logger: Logger,
    ) -> Self {
        Self {
            transpiler,
            file_system,
            aliases: None,
            settings,
            layout,
            logger,
            fail_fast: logger.is_debug(),
            pool: None,
        }
    }

    pub fn with_alias_rewriter(mut self, rewriter: Box<dyn AliasRewriter>) -> Self {
        self.aliases = Some(rewriter);
        self
    }

    /// Return the first per-file error instead of collecting it
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Worker threads for [`build_all`](Self::build_all); `None` uses rayon's global pool.
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.pool = jobs.filter(|n| *n > 0).and_then(|n| {
            match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => Some(pool),
                Err(err) => {
                    self.logger
                        .warn(format!("using default thread pool: {}", err));
                    None
                }
            }
        });
        self
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    /// Clean the output directory and build every file in `files`.
    pub fn build_all(&self, files: &FileSet) -> Result<BuildReport, CompileError> {
        let timer = self.logger.timer("compiling...");
        let out_dir = self.layout.out_dir();

        self.file_system
            .remove_dir_all(out_dir)
            .map_err(|e| CompileError::Clean {
                path: out_dir.to_path_buf(),
                message: e.to_string(),
            })?;

        let sources: Vec<&SourceFile> = files.copy.iter().chain(files.compile.iter()).collect();
        let run = || -> Vec<Result<Outcome, CompileError>> {
            sources.par_iter().map(|file| self.compile_file(file)).collect()
        };
        let results = match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        };

        let mut report = BuildReport::default();
        for result in results {
            match result {
                Ok(Outcome::Compiled(artifact)) => report.compiled.push(artifact),
                Ok(Outcome::Copied(path)) => report.copied.push(path),
                Ok(Outcome::Skipped) => {}
                Err(err) if self.fail_fast => {
                    self.logger.error(&err);
                    return Err(err);
                }
                Err(err) => {
                    self.logger.error(&err);
                    report.failed.push(err);
                }
            }
        }

        if let Some(aliases) = self.alias_rewriter() {
            match aliases.rewrite_dir(&self.settings, &self.layout) {
                Ok(count) => {
                    report.aliased = count;
                    self.logger.debug(format!("rewrote aliases in {} files", count));
                }
                Err(err) if self.fail_fast => {
                    self.logger.error(&err);
                    return Err(err);
                }
                Err(err) => {
                    self.logger.error(&err);
                    report.failed.push(err);
                }
            }
        }

        if report.is_success() {
            timer.end(format!("compiled {} files", report.written()));
        } else {
            self.logger.error(format!(
                "build finished with {} error(s) across {} files",
                report.failed.len(),
                sources.len()
            ));
        }
        Ok(report)
    }

    /// Build one file without cleaning. Only that file's artifact is touched.
    ///
    /// Returns `None` for declaration files.
    pub fn build_one(&self, path: &Path) -> Result<Option<OutputArtifact>, CompileError> {
        let file = SourceFile::new(path);
        let timer = self.logger.timer(format!("compiling {}...", self.display(path)));

        let artifact = match self.compile_file(&file) {
            Ok(Outcome::Compiled(artifact)) => {
                if let Some(aliases) = self.alias_rewriter() {
                    aliases.rewrite_file(&artifact.code, &self.settings, &self.layout)?;
                }
                Some(artifact)
            }
            Ok(Outcome::Copied(code)) => Some(OutputArtifact { code, map: None }),
            Ok(Outcome::Skipped) => None,
            Err(err) => {
                self.logger.error(&err);
                return Err(err);
            }
        };

        timer.end(format!("compiled {}", self.display(path)));
        Ok(artifact)
    }

    /// Delete the artifact (and map) of a removed source file.
    pub fn remove_one(&self, path: &Path) -> Result<Option<OutputArtifact>, CompileError> {
        let file = SourceFile::new(path);
        let Some(artifact) = self
            .layout
            .artifact_for(&file, self.settings.flags.source_map)
        else {
            return Ok(None);
        };

        for output in artifact.paths() {
            self.file_system
                .remove(output)
                .map_err(|e| CompileError::Clean {
                    path: output.to_path_buf(),
                    message: e.to_string(),
                })?;
        }
        self.logger
            .event(format!("removed {}", self.display(&artifact.code)));
        Ok(Some(artifact))
    }

    fn alias_rewriter(&self) -> Option<&dyn AliasRewriter> {
        if !self.settings.flags.has_paths() {
            return None;
        }
        self.aliases.as_deref()
    }

    fn compile_file(&self, file: &SourceFile) -> Result<Outcome, CompileError> {
        let Some(artifact) = self
            .layout
            .artifact_for(file, self.settings.flags.source_map)
        else {
            return Ok(Outcome::Skipped);
        };

        match file.kind() {
            FileKind::Ignored => Ok(Outcome::Skipped),
            FileKind::StaticCopy => {
                self.file_system
                    .copy(file.path(), &artifact.code)
                    .map_err(|e| CompileError::Copy {
                        file: file.path().to_path_buf(),
                        message: e.to_string(),
                    })?;
                Ok(Outcome::Copied(artifact.code))
            }
            FileKind::Compilable => {
                self.transform(file.path(), &artifact)?;
                Ok(Outcome::Compiled(artifact))
            }
        }
    }

    fn transform(&self, path: &Path, artifact: &OutputArtifact) -> Result<(), CompileError> {
        let transform_error = |message: String| CompileError::Transform {
            file: path.to_path_buf(),
            message,
        };

        let source = self
            .file_system
            .read(path)
            .map_err(|e| transform_error(e.to_string()))?;
        let output = self
            .transpiler
            .transform(&TransformRequest {
                path,
                source: &source,
                output_path: &artifact.code,
                flags: &self.settings.flags,
            })
            .map_err(|e| transform_error(e.to_string()))?;

        let code = match (&artifact.map, output.map) {
            (Some(map_path), Some(map)) => {
                self.write(map_path, &map)?;
                with_map_trailer(&output.code, map_path)
            }
            _ => output.code,
        };
        self.write(&artifact.code, &code)
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), CompileError> {
        self.file_system
            .write(path, content)
            .map_err(|e| CompileError::Write {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }

    fn display(&self, path: &Path) -> String {
        relative_to(path, &self.settings.root)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

/// Append `//# sourceMappingURL=<map file name>`
fn with_map_trailer(code: &str, map_path: &Path) -> String {
    let name = map_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut out = code.trim_end_matches('\n').to_string();
    out.push_str("\n//# sourceMappingURL=");
    out.push_str(&name);
    out.push('\n');
    out
}
