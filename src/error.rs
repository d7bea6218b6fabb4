//! Error types for tsrig
//!
//! Library errors use `thiserror`; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tsrig operations
pub type TsrigResult<T> = Result<T, TsrigError>;

/// Top-level error type
#[derive(Error, Debug)]
pub enum TsrigError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Watch(#[from] WatchError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors. Always fatal to the running command.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config path given explicitly (flag or env var) does not exist
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Project config is not valid JSON (after comment stripping)
    #[error("invalid project config {path}: {message}")]
    InvalidJson { path: PathBuf, message: String },

    /// Tool config (`tsrig.toml`) failed to deserialize
    #[error("invalid tool config {path}: {message}")]
    InvalidToolConfig { path: PathBuf, message: String },

    #[error("config {path} extends too many levels deep")]
    ExtendsTooDeep { path: PathBuf },

    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Per-file compile errors
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("failed to compile {file}: {message}")]
    Transform { file: PathBuf, message: String },

    #[error("failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("failed to copy {file}: {message}")]
    Copy { file: PathBuf, message: String },

    #[error("failed to clean {path}: {message}")]
    Clean { path: PathBuf, message: String },

    #[error("failed to rewrite path aliases: {message}")]
    AliasRewrite { message: String },
}

/// Child process errors. Logged, never fatal to the supervisor.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("entry path is not provided")]
    MissingEntry,

    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Neither an executable on PATH nor a project file
    #[error("command not found: {command}")]
    NotFound { command: String },
}

/// Watcher startup errors. Fatal to `dev`.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("failed to start file watcher: {0}")]
    Init(String),

    #[error("failed to watch {path}: {message}")]
    Path { path: PathBuf, message: String },
}

impl From<notify::Error> for WatchError {
    fn from(err: notify::Error) -> Self {
        WatchError::Init(err.to_string())
    }
}
