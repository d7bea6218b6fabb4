//! Configuration module for tsrig
//!
//! Precedence, highest first:
//! 1. CLI flags
//! 2. Environment variables (`TSRIG_*`, `PORT`, `NODE_OPTIONS`)
//! 3. Project tool config (`tsrig.toml`)
//! 4. User tool config (`~/.config/tsrig/config.toml`)
//! 5. Built-in defaults
//!
//! Project settings (compiler options, include/exclude) come from
//! `tsconfig.json`/`jsconfig.json`, see [`project`].

pub mod env;
mod env_validator;
pub mod jsonc;
mod loader;
mod manifest;
pub mod project;
mod types;

pub use env::EnvOverrides;
pub use env_validator::{levenshtein, parse_switch, EnvVarValidator};
pub use loader::{
    load_tool_config, load_with_warnings, user_config_path, LoadedToolConfig, PROJECT_CONFIG_FILE,
};
pub use manifest::{resolve_entry, PackageManifest, MANIFEST_FILE};
pub use project::{load_project, resolve_config_path, CONFIG_FILES};
pub use types::{BuildConfig, ConfigWarning, DevConfig, ToolConfig, ToolsConfig};
