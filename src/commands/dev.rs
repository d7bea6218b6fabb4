use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

use tsrig::application::{CompileEngine, DevOptions, DevOrchestrator, TypeCheckGate};
use tsrig::config::{resolve_entry, PackageManifest};
use tsrig::infrastructure::fs::{FileMatcher, LocalFs};
use tsrig::infrastructure::process::{
    resolve_port, EnvOverlay, Launch, ProcessSupervisor, RequireHooks,
};
use tsrig::infrastructure::tools::{EsbuildTranspiler, PathAliasRewriter, TscTypeChecker};
use tsrig::watcher::{ChangeWatcher, PathFilter};

use super::CommandContext;

pub fn cmd_dev(
    ctx: &CommandContext,
    entry: Option<PathBuf>,
    port: Option<u16>,
    type_check: bool,
) -> Result<i32> {
    let config_path = ctx.config_path()?;
    let settings = ctx.project(config_path.as_deref())?;
    let manifest = PackageManifest::load(&settings.root);

    let Some(entry) = resolve_entry(
        entry.as_deref(),
        ctx.env.entry.as_deref(),
        &manifest,
        &ctx.cwd,
    ) else {
        ctx.logger.error("entry path is not provided");
        return Ok(1);
    };
    let port = resolve_port(port, ctx.env.port, manifest.port());

    let dev = &ctx.tool.config.dev;
    let hooks = RequireHooks::new(dev.preload.clone());
    let overlay = EnvOverlay::for_app(
        Some(port),
        config_path.as_deref(),
        &hooks,
        ctx.env.node_options.as_deref(),
    );
    let launch = Launch::new(dev.runtime.clone(), ctx.cwd.clone(), overlay);
    let process = ProcessSupervisor::new(launch, Some(entry), ctx.logger);

    let matcher = FileMatcher::new(&settings)?;
    let layout = matcher.layout(&settings);
    let roots = matcher.include().roots().to_vec();

    let tools = &ctx.tool.config.tools;
    let checker = TscTypeChecker::locate(&settings.root, tools.tsc.as_deref());
    let transpiler = EsbuildTranspiler::locate(&settings.root, tools.transpiler.as_deref());
    let gate = TypeCheckGate::new(checker, settings.clone(), ctx.logger);
    let engine = CompileEngine::new(transpiler, LocalFs::new(), settings, layout, ctx.logger)
        .with_alias_rewriter(Box::new(PathAliasRewriter::new()));

    let options = DevOptions {
        type_check: type_check || dev.type_check,
        port: Some(port),
    };
    let mut orchestrator = DevOrchestrator::new(gate, engine, process, options, ctx.logger);

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("failed to install the Ctrl+C handler")?;

    let filter: PathFilter = Arc::new(move |path: &Path| matcher.classify_path(path).is_some());
    let mut session = ChangeWatcher::start(&roots, filter, dev.watch_options())
        .context("failed to start watching")?;

    ctx.logger.info(format!("watching {} directories", roots.len()));
    orchestrator.run(&mut session, &running);
    Ok(0)
}
