//! FileSystem port - abstraction over the output-directory writes
//!
//! The compile engine only touches disk through this trait, which keeps
//! its write set (the output directory) explicit and lets tests observe it.

use std::path::{Path, PathBuf};

/// Result type for file system operations
pub type FsResult<T> = Result<T, FsError>;

/// File system operation errors
#[derive(Debug)]
pub enum FsError {
    /// File not found
    NotFound(PathBuf),
    /// Permission denied
    PermissionDenied(PathBuf),
    /// I/O error
    Io(PathBuf, std::io::Error),
}

impl FsError {
    /// Attach the path the failed operation was working on
    pub fn at(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => FsError::Io(path.to_path_buf(), err),
        }
    }
}

impl std::fmt::Display for FsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FsError::NotFound(path) => write!(f, "file not found: {}", path.display()),
            FsError::PermissionDenied(path) => {
                write!(f, "permission denied: {}", path.display())
            }
            FsError::Io(path, err) => write!(f, "I/O error at {}: {}", path.display(), err),
        }
    }
}

impl std::error::Error for FsError {}

/// Abstract file system interface
///
/// Implementations:
/// - `LocalFs` - standard file I/O
/// - test doubles recording writes
pub trait FileSystem: Send + Sync {
    /// Read file content as string
    fn read(&self, path: &Path) -> FsResult<String>;

    /// Write content, creating parent directories
    fn write(&self, path: &Path, content: &str) -> FsResult<()>;

    /// Copy bytes verbatim, creating parent directories
    fn copy(&self, from: &Path, to: &Path) -> FsResult<()>;

    /// Check if file exists
    fn exists(&self, path: &Path) -> bool;

    /// Remove a file; missing files are not an error
    fn remove(&self, path: &Path) -> FsResult<()>;

    /// Remove a directory tree; a missing directory is not an error
    fn remove_dir_all(&self, path: &Path) -> FsResult<()>;
}
