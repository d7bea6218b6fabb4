//! File set resolution
//!
//! Turns a project's include/exclude lists into the concrete files a build
//! compiles or copies:
//!
//! - include entries are glob patterns; a plain directory expands to
//!   `<dir>/**/*`, a plain file matches itself
//! - excludes follow gitignore rules, so `node_modules` matches at any depth
//! - the output directory is always excluded
//!
//! Compilable files must match an include pattern. Non-compilable files are
//! copied when they live under any include root, so `src/**/*.ts` still ships
//! `src/b.json`.
//!
//! Dot-prefixed entries below an include root (`.git`, `.env`) are left out
//! unless an include pattern names the dot literally.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use glob::{MatchOptions, Pattern};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::WalkBuilder;

use crate::domain::services::{common_ancestor, normalize, OutputLayout};
use crate::domain::value_objects::{FileKind, ProjectSettings, SourceFile};
use crate::error::ConfigError;

const GLOB_META: &[char] = &['*', '?', '['];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Files selected for one build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    pub compile: Vec<SourceFile>,
    pub copy: Vec<SourceFile>,
}

impl FileSet {
    pub fn len(&self) -> usize {
        self.compile.len() + self.copy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compile.is_empty() && self.copy.is_empty()
    }

    /// Paths of the compilable files, for the type checker
    pub fn compile_paths(&self) -> Vec<PathBuf> {
        self.compile.iter().map(|f| f.path().to_path_buf()).collect()
    }
}

/// Compiled include patterns plus the directories they are rooted at
#[derive(Debug, Clone)]
pub struct IncludeSet {
    patterns: Vec<Pattern>,
    roots: Vec<PathBuf>,
    names_hidden: bool,
}

impl IncludeSet {
    pub fn new(base: &Path, include: &[String]) -> Result<Self, ConfigError> {
        let mut patterns = Vec::with_capacity(include.len());
        let mut roots = Vec::with_capacity(include.len());
        let names_hidden = include.iter().any(|entry| has_hidden_component(Path::new(entry)));

        for entry in include {
            let absolute = normalize(&base.join(entry.trim_start_matches("./")));
            let text = absolute.to_string_lossy().into_owned();

            let (pattern, root) = if text.contains(GLOB_META) {
                (text.clone(), literal_prefix(&absolute))
            } else if absolute.is_file() {
                let parent = absolute.parent().map(Path::to_path_buf).unwrap_or_default();
                (Pattern::escape(&text), parent)
            } else {
                let dir = Pattern::escape(&text);
                (format!("{}/**/*", dir.trim_end_matches('/')), absolute.clone())
            };

            let compiled = Pattern::new(&pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: entry.clone(),
                message: e.to_string(),
            })?;
            patterns.push(compiled);
            roots.push(root);
        }

        Ok(Self {
            patterns,
            roots,
            names_hidden,
        })
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_path_with(path, MATCH_OPTIONS))
    }

    /// Whether `path` sits below any include root
    pub fn contains(&self, path: &Path) -> bool {
        self.roots.iter().any(|root| path.starts_with(root))
    }

    /// Whether every include root holding `path` reaches it through a
    /// dot-prefixed component
    pub fn is_hidden(&self, path: &Path) -> bool {
        let mut holders = self
            .roots
            .iter()
            .filter_map(|root| path.strip_prefix(root).ok())
            .peekable();
        holders.peek().is_some() && holders.all(has_hidden_component)
    }

    /// Whether any include entry spells out a dot-prefixed component
    pub fn names_hidden(&self) -> bool {
        self.names_hidden
    }

    /// Directories the includes are rooted at; these are what gets walked or watched
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

fn has_hidden_component(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(part) => part.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

/// Path components up to the first one containing a glob metacharacter
fn literal_prefix(pattern: &Path) -> PathBuf {
    let mut prefix = PathBuf::new();
    for component in pattern.components() {
        if let Component::Normal(part) = component {
            if part.to_string_lossy().contains(GLOB_META) {
                break;
            }
        }
        prefix.push(component.as_os_str());
    }
    prefix
}

/// Exclude patterns with gitignore semantics, plus the output directory
#[derive(Debug, Clone)]
pub struct ExcludeSet {
    base: PathBuf,
    out_dir: PathBuf,
    ignore: Gitignore,
}

impl ExcludeSet {
    pub fn new(base: &Path, exclude: &[String], out_dir: &Path) -> Result<Self, ConfigError> {
        let base = normalize(base);
        let mut builder = GitignoreBuilder::new(&base);
        for entry in exclude {
            builder
                .add_line(None, entry.trim_start_matches("./"))
                .map_err(|e| ConfigError::InvalidPattern {
                    pattern: entry.clone(),
                    message: e.to_string(),
                })?;
        }
        let ignore = builder.build().map_err(|e| ConfigError::InvalidPattern {
            pattern: exclude.join(", "),
            message: e.to_string(),
        })?;

        Ok(Self {
            base,
            out_dir: normalize(out_dir),
            ignore,
        })
    }

    pub fn is_excluded(&self, path: &Path, is_dir: bool) -> bool {
        if path.starts_with(&self.out_dir) {
            return true;
        }
        match path.strip_prefix(&self.base) {
            Ok(rel) if rel.as_os_str().is_empty() => false,
            Ok(rel) => self
                .ignore
                .matched_path_or_any_parents(rel, is_dir)
                .is_ignore(),
            Err(_) => false,
        }
    }
}

/// Include and exclude rules for one project
#[derive(Debug, Clone)]
pub struct FileMatcher {
    include: IncludeSet,
    exclude: Arc<ExcludeSet>,
}

impl FileMatcher {
    pub fn new(settings: &ProjectSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            include: IncludeSet::new(&settings.root, &settings.include)?,
            exclude: Arc::new(ExcludeSet::new(
                &settings.root,
                &settings.exclude,
                &settings.out_dir,
            )?),
        })
    }

    pub fn include(&self) -> &IncludeSet {
        &self.include
    }

    /// How `path` takes part in the build, or `None` if it does not.
    ///
    /// `path` must be absolute.
    pub fn classify_path(&self, path: &Path) -> Option<FileKind> {
        let path = normalize(path);
        if self.exclude.is_excluded(&path, false) {
            return None;
        }
        match FileKind::of(&path) {
            FileKind::Ignored => None,
            FileKind::Compilable if self.include.matches(&path) => Some(FileKind::Compilable),
            FileKind::Compilable => None,
            FileKind::StaticCopy if self.include.matches(&path) => Some(FileKind::StaticCopy),
            FileKind::StaticCopy
                if self.include.contains(&path) && !self.include.is_hidden(&path) =>
            {
                Some(FileKind::StaticCopy)
            }
            FileKind::StaticCopy => None,
        }
    }

    /// Output layout: `rootDir` when configured, else the include roots' common ancestor
    pub fn layout(&self, settings: &ProjectSettings) -> OutputLayout {
        let root_dir = settings
            .flags
            .root_dir
            .clone()
            .or_else(|| common_ancestor(self.include.roots().iter().map(PathBuf::as_path)))
            .unwrap_or_else(|| settings.root.clone());
        OutputLayout::new(&settings.root, &root_dir, &settings.out_dir)
    }
}

/// Walks include roots and builds the [`FileSet`]
#[derive(Debug, Clone)]
pub struct FileSetResolver {
    matcher: FileMatcher,
}

impl FileSetResolver {
    pub fn new(matcher: FileMatcher) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &FileMatcher {
        &self.matcher
    }

    /// Resolve the project's file set. Unreadable directories are skipped.
    pub fn resolve(&self) -> FileSet {
        let mut compile = Vec::new();
        let mut copy = Vec::new();

        for root in self.matcher.include.roots() {
            let exclude = Arc::clone(&self.matcher.exclude);
            let include = self.matcher.include.clone();
            let walker = WalkBuilder::new(root)
                .standard_filters(false)
                .follow_links(false)
                .filter_entry(move |entry| {
                    let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                    if is_dir && !include.names_hidden() && include.is_hidden(entry.path()) {
                        return false;
                    }
                    !exclude.is_excluded(entry.path(), is_dir)
                })
                .build();

            for entry in walker.flatten() {
                if !entry.file_type().is_some_and(|t| t.is_file()) {
                    continue;
                }
                match self.matcher.classify_path(entry.path()) {
                    Some(FileKind::Compilable) => compile.push(SourceFile::new(normalize(entry.path()))),
                    Some(FileKind::StaticCopy) => copy.push(SourceFile::new(normalize(entry.path()))),
                    _ => {}
                }
            }
        }

        sort_dedup(&mut compile);
        sort_dedup(&mut copy);
        FileSet { compile, copy }
    }
}

fn sort_dedup(files: &mut Vec<SourceFile>) {
    files.sort_by(|a, b| a.path().cmp(b.path()));
    files.dedup();
}
