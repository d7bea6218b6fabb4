//! Shared pieces for the scenarios

use std::path::Path;

use tsrig::application::{BuildOptions, BuildOutcome, BuildUseCase, CompileEngine, TypeCheckGate};
use tsrig::config::load_project;
use tsrig::domain::ports::{
    TransformError, TransformOutput, TransformRequest, Transpiler, TypeChecker,
};
use tsrig::domain::value_objects::{Diagnostic, ProjectSettings};
use tsrig::infrastructure::fs::{FileMatcher, FileSetResolver, LocalFs};
use tsrig::infrastructure::tools::PathAliasRewriter;
use tsrig::ui::Logger;

/// Returns the source unchanged; rejects files whose name starts with `bad`
pub struct PassThrough;

impl Transpiler for PassThrough {
    fn transform(&self, request: &TransformRequest<'_>) -> Result<TransformOutput, TransformError> {
        let name = request
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if name.starts_with("bad") {
            return Err(TransformError::Rejected(format!("{}: unexpected token", name)));
        }
        Ok(TransformOutput {
            code: request.source.to_string(),
            map: None,
        })
    }
}

pub struct CleanChecker;

impl TypeChecker for CleanChecker {
    fn diagnose(
        &self,
        _files: &[std::path::PathBuf],
        _settings: &ProjectSettings,
    ) -> Result<Vec<Diagnostic>, String> {
        Ok(Vec::new())
    }
}

/// Load `root/tsconfig.json` and run a full build
pub fn build(root: &Path, jobs: Option<usize>) -> BuildOutcome {
    let config = root.join("tsconfig.json");
    let settings = load_project(root, Some(config.as_path())).unwrap();
    let matcher = FileMatcher::new(&settings).unwrap();
    let layout = matcher.layout(&settings);
    let files = FileSetResolver::new(matcher).resolve();

    let gate = TypeCheckGate::new(CleanChecker, settings.clone(), Logger::silent());
    let engine = CompileEngine::new(PassThrough, LocalFs::new(), settings, layout, Logger::silent())
        .with_alias_rewriter(Box::new(PathAliasRewriter::new()))
        .with_jobs(jobs);

    BuildUseCase::new(&gate, &engine)
        .execute(files, &BuildOptions::default())
        .unwrap()
}
