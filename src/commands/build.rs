use std::path::PathBuf;

use anyhow::{Context, Result};

use tsrig::application::{BuildOptions, BuildOutcome, BuildUseCase, CompileEngine, TypeCheckGate};
use tsrig::infrastructure::fs::{FileMatcher, FileSetResolver, LocalFs};
use tsrig::infrastructure::tools::{EsbuildTranspiler, PathAliasRewriter, TscTypeChecker};

use super::CommandContext;

pub fn cmd_build(
    ctx: &CommandContext,
    files: Vec<PathBuf>,
    transpile_only: bool,
    out_dir: Option<PathBuf>,
) -> Result<i32> {
    let config_path = ctx.config_path()?;
    let mut settings = ctx.project(config_path.as_deref())?;
    if let Some(out_dir) = out_dir {
        settings = settings.with_out_dir(out_dir);
    }

    let matcher = FileMatcher::new(&settings)?;
    let layout = matcher.layout(&settings);
    let resolved = FileSetResolver::new(matcher).resolve();
    ctx.logger.debug(format!("{} files matched", resolved.len()));

    let tools = &ctx.tool.config.tools;
    let checker = TscTypeChecker::locate(&settings.root, tools.tsc.as_deref());
    let transpiler = EsbuildTranspiler::locate(&settings.root, tools.transpiler.as_deref());

    let gate = TypeCheckGate::new(checker, settings.clone(), ctx.logger);
    let engine = CompileEngine::new(transpiler, LocalFs::new(), settings, layout, ctx.logger)
        .with_alias_rewriter(Box::new(PathAliasRewriter::new()))
        .with_jobs(ctx.tool.config.build.jobs);

    let options = BuildOptions {
        files: files.into_iter().map(|f| ctx.cwd.join(f)).collect(),
        transpile_only,
    };
    let outcome = BuildUseCase::new(&gate, &engine)
        .execute(resolved, &options)
        .context("build failed")?;

    match outcome {
        BuildOutcome::Built(report) if report.is_success() => Ok(0),
        BuildOutcome::Built(_) | BuildOutcome::TypeCheckFailed(_) => Ok(1),
    }
}
