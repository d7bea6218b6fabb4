//! Command handlers
//!
//! Everything that reads the process environment, the working directory or
//! CLI flags lives here; the library below only sees resolved values.

pub mod build;
pub mod dev;
pub mod run;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use tsrig::config::{
    self, load_project, resolve_config_path, user_config_path, EnvOverrides, LoadedToolConfig,
};
use tsrig::domain::value_objects::ProjectSettings;
use tsrig::ui::terminal::detect_capabilities;
use tsrig::ui::{LogFormat, Logger};

use crate::cli::{Cli, Commands};

/// Resolved per-invocation state shared by the commands
pub struct CommandContext {
    pub cwd: PathBuf,
    pub env: EnvOverrides,
    pub logger: Logger,
    pub tool: LoadedToolConfig,
    /// `-c/--config`
    pub config_flag: Option<PathBuf>,
}

impl CommandContext {
    pub fn new(cli: &Cli, env: EnvOverrides, logger: Logger) -> Result<Self> {
        let cwd = std::env::current_dir().context("cannot read the working directory")?;

        let user_config = user_config_path();
        let tool = config::load_tool_config(&cwd, user_config.as_deref())
            .context("failed to load tool config")?;
        for warning in &tool.warnings {
            logger.warn(warning);
        }
        if let Some(source) = &tool.source {
            logger.debug(format!("tool config: {}", source.display()));
        }

        Ok(Self {
            cwd,
            env,
            logger,
            tool,
            config_flag: cli.config.clone(),
        })
    }

    /// Project config path: flag, then environment, then discovery
    pub fn config_path(&self) -> Result<Option<PathBuf>> {
        Ok(resolve_config_path(
            self.config_flag.as_deref(),
            self.env.config.as_deref(),
            &self.cwd,
        )?)
    }

    pub fn project(&self, config_path: Option<&Path>) -> Result<ProjectSettings> {
        let settings = load_project(&self.cwd, config_path)?;
        match config_path {
            Some(path) => self.logger.debug(format!("project config: {}", path.display())),
            None => self.logger.debug("no project config found, using defaults"),
        }
        Ok(settings)
    }
}

/// Logger for this invocation: flags win over the environment
pub fn logger_for(cli: &Cli, env: &EnvOverrides) -> Logger {
    let format = if cli.json {
        LogFormat::Json
    } else {
        LogFormat::Human
    };
    let color = detect_capabilities().supports_color && !cli.no_color && !env.no_color;
    Logger::new(format, color, cli.debug || env.debug)
}

/// Run the selected command and return the process exit code.
pub fn dispatch(cli: Cli, env: EnvOverrides, logger: Logger) -> Result<i32> {
    if logger.is_debug() {
        logger.info("debugger is on");
    }
    let ctx = CommandContext::new(&cli, env, logger)?;

    match cli.command {
        Commands::Build {
            files,
            transpile_only,
            out_dir,
        } => build::cmd_build(&ctx, files, transpile_only, out_dir),
        Commands::Dev {
            entry,
            port,
            type_check,
        } => dev::cmd_dev(&ctx, entry, port, type_check),
        Commands::Run { command, args } => run::cmd_run(&ctx, &command, &args),
    }
}
