//! Source files and their output artifacts

use std::path::{Path, PathBuf};

/// How a matched file is treated by the build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Transformed by the transpiler into `.js`
    Compilable,
    /// Copied verbatim into the output directory
    StaticCopy,
    /// Declaration files; produce no output
    Ignored,
}

/// Extensions handed to the transpiler
pub const COMPILABLE_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs", "es6", "es",
];

/// Declaration-only suffixes
pub const DECLARATION_SUFFIXES: &[&str] = &[".d.ts", ".d.mts", ".d.cts"];

impl FileKind {
    /// Classify a path by its file name alone.
    pub fn of(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if DECLARATION_SUFFIXES.iter().any(|s| name.ends_with(s)) {
            return FileKind::Ignored;
        }

        let compilable = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| COMPILABLE_EXTENSIONS.contains(&e))
            .unwrap_or(false);

        if compilable {
            FileKind::Compilable
        } else {
            FileKind::StaticCopy
        }
    }
}

/// An absolute source path plus its classification
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFile {
    path: PathBuf,
    kind: FileKind,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = FileKind::of(&path);
        Self { path, kind }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn is_compilable(&self) -> bool {
        self.kind == FileKind::Compilable
    }
}

/// Files written for one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub code: PathBuf,
    pub map: Option<PathBuf>,
}

impl OutputArtifact {
    /// Paths to write or delete, code first
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.code.as_path()).chain(self.map.as_deref())
    }
}
