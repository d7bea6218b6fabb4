//! How child processes are launched: runtime, working directory and the
//! environment overlay they receive.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::env::{
    CONFIG_VAR, LOADER_PROJECT_VAR, NODE_OPTIONS_VAR as NODE_OPTIONS, PORT_VAR as PORT,
};
use crate::domain::ports::SourceLoader;

/// Variables set on top of the inherited environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverlay {
    vars: BTreeMap<String, String>,
}

impl EnvOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Overlay for the application child: port, config path and loader preloads.
    ///
    /// `inherited_node_options` is kept in front of the preloads.
    pub fn for_app(
        port: Option<u16>,
        config: Option<&Path>,
        loader: &dyn SourceLoader,
        inherited_node_options: Option<&str>,
    ) -> Self {
        let mut overlay = Self::new().set(
            NODE_OPTIONS,
            compose_node_options(inherited_node_options, &loader.preload_args()),
        );
        if let Some(port) = port {
            overlay = overlay.set(PORT, port.to_string());
        }
        if let Some(config) = config {
            let config = config.to_string_lossy();
            overlay = overlay
                .set(CONFIG_VAR, config.as_ref())
                .set(LOADER_PROJECT_VAR, config.as_ref());
        }
        overlay
    }

    pub fn apply(&self, command: &mut Command) {
        command.envs(&self.vars);
    }
}

/// `<inherited> <preloads...> --no-warnings`
pub fn compose_node_options(inherited: Option<&str>, preload: &[String]) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(inherited) = inherited.map(str::trim).filter(|s| !s.is_empty()) {
        parts.push(inherited);
    }
    parts.extend(preload.iter().map(String::as_str));
    parts.push("--no-warnings");
    parts.join(" ")
}

/// Preloads modules with `-r`, registering the in-process TypeScript hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireHooks {
    modules: Vec<String>,
}

impl RequireHooks {
    pub fn new(modules: Vec<String>) -> Self {
        Self { modules }
    }
}

impl SourceLoader for RequireHooks {
    fn preload_args(&self) -> Vec<String> {
        self.modules
            .iter()
            .flat_map(|m| ["-r".to_string(), m.clone()])
            .collect()
    }
}

/// Runtime, working directory and overlay shared by every child of a command
#[derive(Debug, Clone)]
pub struct Launch {
    pub runtime: String,
    pub cwd: PathBuf,
    pub overlay: EnvOverlay,
}

impl Launch {
    pub fn new(runtime: impl Into<String>, cwd: impl Into<PathBuf>, overlay: EnvOverlay) -> Self {
        Self {
            runtime: runtime.into(),
            cwd: cwd.into(),
            overlay,
        }
    }

    /// A command for `program` with the working directory and overlay applied
    pub fn command(&self, program: impl AsRef<std::ffi::OsStr>) -> Command {
        let mut command = Command::new(program);
        command.current_dir(&self.cwd);
        self.overlay.apply(&mut command);
        command
    }
}
