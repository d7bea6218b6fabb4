//! Output layout
//!
//! Maps a source path to its place under the output directory:
//! `out_dir` + (source relative to the root directory). The root directory
//! is `rootDir` when configured, otherwise the nearest common ancestor of the
//! include roots. Leading `..` segments are dropped so that sources outside
//! the root still land under `out_dir`.

use std::path::{Component, Path, PathBuf};

use crate::domain::value_objects::{OutputArtifact, SourceFile, SourceMapMode};

/// Lexically normalize a path: drop `.`, fold `..` into the previous segment.
///
/// Leading `..` segments of a relative path are kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// Lexical path of `path` relative to `base`. Both are normalized first.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path = normalize(path);
    let base = normalize(base);

    let path_parts: Vec<_> = path.components().collect();
    let base_parts: Vec<_> = base.components().collect();

    let shared = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in shared..base_parts.len() {
        rel.push("..");
    }
    for part in &path_parts[shared..] {
        rel.push(part.as_os_str());
    }
    rel
}

/// Deepest directory containing every path in `paths`.
pub fn common_ancestor<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Option<PathBuf> {
    let mut iter = paths.into_iter();
    let first = normalize(iter.next()?);
    let mut prefix: Vec<Component<'_>> = first.components().collect();

    for path in iter {
        let path = normalize(path);
        let shared = prefix
            .iter()
            .zip(path.components())
            .take_while(|(a, b)| **a == *b)
            .count();
        prefix.truncate(shared);
    }

    Some(prefix.iter().collect())
}

/// Where build outputs go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    base: PathBuf,
    root_dir: PathBuf,
    out_dir: PathBuf,
}

impl OutputLayout {
    /// `base` resolves relative sources; `root_dir` and `out_dir` are made
    /// absolute against it.
    pub fn new(base: &Path, root_dir: &Path, out_dir: &Path) -> Self {
        Self {
            base: normalize(base),
            root_dir: normalize(&base.join(root_dir)),
            out_dir: normalize(&base.join(out_dir)),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Output path for `source`, optionally replacing its extension.
    ///
    /// Pure: depends only on the arguments and the layout.
    pub fn output_path_for(&self, source: &Path, extension: Option<&str>) -> PathBuf {
        let absolute = normalize(&self.base.join(source));
        let relative = relative_to(&absolute, &self.root_dir);

        let mut out = self.out_dir.clone();
        let mut pushed = false;
        for component in relative.components() {
            if let Component::Normal(part) = component {
                out.push(part);
                pushed = true;
            }
        }
        if !pushed {
            if let Some(name) = absolute.file_name() {
                out.push(name);
            }
        }

        if let Some(ext) = extension {
            out.set_extension(ext);
        }
        out
    }

    /// Artifact for a source file, or `None` for declaration files.
    pub fn artifact_for(&self, file: &SourceFile, maps: SourceMapMode) -> Option<OutputArtifact> {
        use crate::domain::value_objects::FileKind;

        match file.kind() {
            FileKind::Ignored => None,
            FileKind::StaticCopy => Some(OutputArtifact {
                code: self.output_path_for(file.path(), None),
                map: None,
            }),
            FileKind::Compilable => {
                let code = self.output_path_for(file.path(), Some("js"));
                let map = (maps == SourceMapMode::File).then(|| map_path_for(&code));
                Some(OutputArtifact { code, map })
            }
        }
    }
}

/// `<code>.map`
pub fn map_path_for(code: &Path) -> PathBuf {
    let mut name = code.as_os_str().to_owned();
    name.push(".map");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> OutputLayout {
        OutputLayout::new(Path::new("/proj"), Path::new("src"), Path::new("dist"))
    }

    #[test]
    fn normalize_folds_parent_segments() {
        assert_eq!(normalize(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(normalize(Path::new("../x/./y")), PathBuf::from("../x/y"));
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
    }

    #[test]
    fn relative_to_walks_up() {
        assert_eq!(
            relative_to(Path::new("/proj/shared/x.ts"), Path::new("/proj/src")),
            PathBuf::from("../shared/x.ts")
        );
        assert_eq!(
            relative_to(Path::new("/proj/src/a.ts"), Path::new("/proj/src")),
            PathBuf::from("a.ts")
        );
    }

    #[test]
    fn common_ancestor_of_siblings() {
        let paths = [Path::new("/proj/src/api"), Path::new("/proj/src/web")];
        assert_eq!(common_ancestor(paths), Some(PathBuf::from("/proj/src")));
    }

    #[test]
    fn common_ancestor_of_single_path_is_itself() {
        assert_eq!(
            common_ancestor([Path::new("/proj/src")]),
            Some(PathBuf::from("/proj/src"))
        );
        assert_eq!(common_ancestor(std::iter::empty::<&Path>()), None);
    }

    #[test]
    fn nested_source_keeps_subdirectories() {
        assert_eq!(
            layout().output_path_for(Path::new("src/routes/users.ts"), Some("js")),
            PathBuf::from("/proj/dist/routes/users.js")
        );
    }

    #[test]
    fn relative_and_absolute_sources_agree() {
        let l = layout();
        assert_eq!(
            l.output_path_for(Path::new("src/a.ts"), Some("js")),
            l.output_path_for(Path::new("/proj/src/a.ts"), Some("js"))
        );
    }

    #[test]
    fn file_directly_in_project_root() {
        let l = OutputLayout::new(Path::new("/proj"), Path::new("."), Path::new("dist"));
        assert_eq!(
            l.output_path_for(Path::new("index.ts"), Some("js")),
            PathBuf::from("/proj/dist/index.js")
        );
    }

    #[test]
    fn file_outside_root_is_kept_under_out_dir() {
        assert_eq!(
            layout().output_path_for(Path::new("src/../shared/util.ts"), Some("js")),
            PathBuf::from("/proj/dist/shared/util.js")
        );
        assert_eq!(
            layout().output_path_for(Path::new("/elsewhere/lib/x.ts"), Some("js")),
            PathBuf::from("/proj/dist/elsewhere/lib/x.js")
        );
    }

    #[test]
    fn extension_is_only_replaced_when_asked() {
        assert_eq!(
            layout().output_path_for(Path::new("src/b.json"), None),
            PathBuf::from("/proj/dist/b.json")
        );
        assert_eq!(
            layout().output_path_for(Path::new("src/a.spec.ts"), Some("js")),
            PathBuf::from("/proj/dist/a.spec.js")
        );
    }

    #[test]
    fn artifact_for_declaration_is_none() {
        let file = SourceFile::new("/proj/src/types.d.ts");
        assert!(layout().artifact_for(&file, SourceMapMode::File).is_none());
    }

    #[test]
    fn artifact_for_compilable_with_file_maps() {
        let file = SourceFile::new("/proj/src/a.ts");
        let artifact = layout().artifact_for(&file, SourceMapMode::File).unwrap();
        assert_eq!(artifact.code, PathBuf::from("/proj/dist/a.js"));
        assert_eq!(artifact.map, Some(PathBuf::from("/proj/dist/a.js.map")));

        let inline = layout().artifact_for(&file, SourceMapMode::Inline).unwrap();
        assert_eq!(inline.map, None);
    }
}
