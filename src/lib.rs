//! tsrig - build, watch and run TypeScript projects
//!
//! tsrig wraps an external type checker (`tsc`) and transpiler (`esbuild`)
//! around a file watcher and a process supervisor, and provides the `build`,
//! `dev` and `run` commands.
//!
//! Layers:
//! - `domain` - ports, value objects and pure services
//! - `infrastructure` - file system, processes and external tools
//! - `application` - compile engine, type-check gate, build and dev use cases
//! - `watcher` - debounced file watching
//! - `config` - tsconfig/jsconfig, `tsrig.toml`, environment
//! - `ui` - log output

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod watcher;

// Re-exports for convenience
pub use application::{BuildUseCase, CompileEngine, DevOrchestrator, TypeCheckGate};
pub use config::{load_project, EnvOverrides, ToolConfig};
pub use domain::value_objects::{ProjectSettings, SourceFile};
pub use error::{TsrigError, TsrigResult};
pub use watcher::{ChangeWatcher, WatchEvent, WatchOptions, WatchSession};
