//! Local File System Implementation
//!
//! Implements the FileSystem port for local disk operations.

use std::io::Write;
use std::path::Path;

use crate::domain::ports::file_system::{FileSystem, FsError, FsResult};

/// Local file system implementation
///
/// Writes go through a temp file in the target directory and are renamed into
/// place, so a restarted child never reads a half-written module.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    /// Create a new LocalFs instance
    pub fn new() -> Self {
        Self
    }

    fn ensure_parent(path: &Path) -> FsResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| FsError::at(parent, e))?;
        }
        Ok(())
    }
}

impl FileSystem for LocalFs {
    fn read(&self, path: &Path) -> FsResult<String> {
        std::fs::read_to_string(path).map_err(|e| FsError::at(path, e))
    }

    fn write(&self, path: &Path, content: &str) -> FsResult<()> {
        Self::ensure_parent(path)?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| FsError::at(dir, e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| FsError::at(path, e))?;
        tmp.persist(path).map_err(|e| FsError::at(path, e.error))?;
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> FsResult<()> {
        Self::ensure_parent(to)?;
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| FsError::at(from, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove(&self, path: &Path) -> FsResult<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FsError::at(path, e)),
        }
    }

    fn remove_dir_all(&self, path: &Path) -> FsResult<()> {
        match std::fs::remove_dir_all(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FsError::at(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn local_fs_write_and_read() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.js");
        let fs = LocalFs::new();

        fs.write(&file, "module.exports = 1;").unwrap();
        let content = fs.read(&file).unwrap();

        assert_eq!(content, "module.exports = 1;");
    }

    #[test]
    fn local_fs_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("dist").join("routes").join("users.js");
        let fs = LocalFs::new();

        fs.write(&file, "content").unwrap();

        assert!(file.exists());
    }

    #[test]
    fn local_fs_write_overwrites() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.js");
        let fs = LocalFs::new();

        fs.write(&file, "old").unwrap();
        fs.write(&file, "new").unwrap();

        assert_eq!(fs.read(&file).unwrap(), "new");
    }

    #[test]
    fn local_fs_copy_is_byte_exact() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("b.json");
        let to = dir.path().join("dist").join("b.json");
        std::fs::write(&from, b"{\"k\": [1, 2]}\n").unwrap();
        let fs = LocalFs::new();

        fs.copy(&from, &to).unwrap();

        assert_eq!(std::fs::read(&to).unwrap(), std::fs::read(&from).unwrap());
    }

    #[test]
    fn local_fs_remove_missing_is_ok() {
        let dir = tempdir().unwrap();
        let fs = LocalFs::new();

        fs.remove(&dir.path().join("missing.js")).unwrap();
        fs.remove_dir_all(&dir.path().join("missing")).unwrap();
    }

    #[test]
    fn local_fs_remove_dir_all() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("dist");
        let fs = LocalFs::new();
        fs.write(&out.join("old.js"), "stale").unwrap();

        fs.remove_dir_all(&out).unwrap();

        assert!(!fs.exists(&out));
    }

    #[test]
    fn local_fs_read_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let fs = LocalFs::new();

        let err = fs.read(&dir.path().join("nope.ts")).unwrap_err();
        assert!(matches!(err, FsError::NotFound(_)));
    }
}
