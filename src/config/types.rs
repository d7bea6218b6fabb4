//! Tool configuration (`tsrig.toml`)

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::watcher::{WatchOptions, DEBOUNCE_MS, SETTLE_MS};

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Dev loop configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DevConfig {
    /// Executable that runs the entry file
    #[serde(default = "default_runtime")]
    pub runtime: String,

    /// Modules preloaded into the child with `-r`
    #[serde(default = "default_preload")]
    pub preload: Vec<String>,

    #[serde(default = "default_quiescence_ms")]
    pub quiescence_ms: u64,

    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Type-check before every restart
    #[serde(default)]
    pub type_check: bool,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
            preload: default_preload(),
            quiescence_ms: default_quiescence_ms(),
            settle_ms: default_settle_ms(),
            type_check: false,
        }
    }
}

impl DevConfig {
    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions {
            quiescence: Duration::from_millis(self.quiescence_ms),
            settle: Duration::from_millis(self.settle_ms),
            ..WatchOptions::default()
        }
    }
}

fn default_runtime() -> String {
    "node".to_string()
}

fn default_preload() -> Vec<String> {
    vec!["@swc-node/register".to_string()]
}

fn default_quiescence_ms() -> u64 {
    DEBOUNCE_MS
}

fn default_settle_ms() -> u64 {
    SETTLE_MS
}

/// Build configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BuildConfig {
    /// Worker threads for the parallel compile; defaults to the CPU count
    #[serde(default)]
    pub jobs: Option<usize>,
}

/// External tool overrides: a project-relative path or a name on `PATH`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ToolsConfig {
    #[serde(default)]
    pub tsc: Option<String>,

    #[serde(default)]
    pub transpiler: Option<String>,
}

/// Root of `tsrig.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ToolConfig {
    #[serde(default)]
    pub dev: DevConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}
