//! Tool configuration loading
//!
//! The project file wins over the user file; neither is merged with the other.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::env_validator::levenshtein;
use super::types::{ConfigWarning, ToolConfig};

/// Project tool config, in the working directory
pub const PROJECT_CONFIG_FILE: &str = "tsrig.toml";

/// Where the user tool config lives (`~/.config/tsrig/config.toml` on Linux)
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tsrig").join("config.toml"))
}

/// A loaded tool config and where it came from
#[derive(Debug, Clone, Default)]
pub struct LoadedToolConfig {
    pub config: ToolConfig,
    /// `None` when built-in defaults are used
    pub source: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> Result<(ToolConfig, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: ToolConfig = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::InvalidToolConfig {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Project config in `project_root`, else the user config, else defaults.
///
/// A file that exists but does not parse is an error.
pub fn load_tool_config(
    project_root: &Path,
    user_config: Option<&Path>,
) -> Result<LoadedToolConfig, ConfigError> {
    let candidates = std::iter::once(project_root.join(PROJECT_CONFIG_FILE))
        .chain(user_config.map(Path::to_path_buf));

    for path in candidates {
        if path.is_file() {
            let (config, warnings) = load_with_warnings(&path)?;
            return Ok(LoadedToolConfig {
                config,
                source: Some(path),
                warnings,
            });
        }
    }

    Ok(LoadedToolConfig::default())
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "dev",
        "runtime",
        "preload",
        "quiescence_ms",
        "settle_ms",
        "type_check",
        "build",
        "jobs",
        "tools",
        "tsc",
        "transpiler",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}
