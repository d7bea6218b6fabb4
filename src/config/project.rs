//! Project config discovery and loading (tsconfig.json / jsconfig.json)

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::domain::services::{normalize, relative_to};
use crate::domain::value_objects::{CompileFlags, ProjectSettings};
use crate::error::ConfigError;

use super::jsonc;

/// Searched in order in the working directory
pub const CONFIG_FILES: &[&str] = &["tsconfig.json", "jsconfig.json"];

const MAX_EXTENDS_DEPTH: usize = 16;

/// Compiler options holding paths relative to the config that sets them
const PATH_OPTIONS: &[&str] = &["outDir", "rootDir", "baseUrl"];

/// Pick the project config: explicit path, then the environment, then the
/// well-known file names. `None` means built-in defaults.
///
/// An explicit or environment path that does not exist is an error.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env: Option<&Path>,
    cwd: &Path,
) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = explicit.or(env) {
        let path = normalize(&cwd.join(path));
        if !path.is_file() {
            return Err(ConfigError::NotFound { path });
        }
        return Ok(Some(path));
    }

    Ok(CONFIG_FILES
        .iter()
        .map(|name| cwd.join(name))
        .find(|path| path.is_file()))
}

/// Load settings from `config_path`, or the built-in defaults rooted at `cwd`.
pub fn load_project(cwd: &Path, config_path: Option<&Path>) -> Result<ProjectSettings, ConfigError> {
    let Some(path) = config_path else {
        return Ok(ProjectSettings::defaults(cwd));
    };

    let path = normalize(&cwd.join(path));
    let root = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.to_path_buf());
    let raw = RawConfig::load(&path, 0)?;

    let flags = CompileFlags::from_compiler_options(&raw.compiler_options, &root);
    let out_dir = raw
        .compiler_options
        .get("outDir")
        .and_then(Value::as_str)
        .map(PathBuf::from)
        .unwrap_or_else(|| root.join(ProjectSettings::DEFAULT_OUT_DIR));

    let relative = |paths: Vec<PathBuf>| -> Vec<String> {
        paths
            .iter()
            .map(|p| {
                let rel = relative_to(p, &root);
                if rel.as_os_str().is_empty() {
                    ".".to_string()
                } else {
                    rel.to_string_lossy().replace('\\', "/")
                }
            })
            .collect()
    };

    let mut include = raw
        .include
        .map(relative)
        .unwrap_or_else(|| vec![".".to_string()]);
    if let Some(files) = raw.files {
        include.extend(relative(files));
    }
    let exclude = raw
        .exclude
        .map(relative)
        .unwrap_or_else(|| vec!["node_modules".to_string()]);

    Ok(ProjectSettings {
        root,
        include,
        exclude,
        out_dir: normalize(&out_dir),
        config_path: Some(path),
        flags,
    })
}

/// One config file merged with everything it extends.
///
/// Paths are absolute, resolved against the file that declared them.
#[derive(Debug, Default)]
struct RawConfig {
    compiler_options: Map<String, Value>,
    include: Option<Vec<PathBuf>>,
    exclude: Option<Vec<PathBuf>>,
    files: Option<Vec<PathBuf>>,
}

impl RawConfig {
    fn load(path: &Path, depth: usize) -> Result<Self, ConfigError> {
        if depth > MAX_EXTENDS_DEPTH {
            return Err(ConfigError::ExtendsTooDeep {
                path: path.to_path_buf(),
            });
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let value = jsonc::parse(&text).map_err(|e| ConfigError::InvalidJson {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let Value::Object(object) = value else {
            return Err(ConfigError::InvalidJson {
                path: path.to_path_buf(),
                message: "expected a JSON object".to_string(),
            });
        };
        let dir = path.parent().unwrap_or_else(|| Path::new("."));

        let mut merged = RawConfig::default();
        for parent in extends_list(&object) {
            let parent_path = resolve_extends(&parent, dir).ok_or_else(|| ConfigError::NotFound {
                path: dir.join(&parent),
            })?;
            merged.merge(RawConfig::load(&parent_path, depth + 1)?);
        }

        merged.merge(RawConfig {
            compiler_options: compiler_options(&object, dir),
            include: path_list(&object, "include", dir),
            exclude: path_list(&object, "exclude", dir),
            files: path_list(&object, "files", dir),
        });
        Ok(merged)
    }

    /// `child` overrides `self`: options key by key, lists wholesale
    fn merge(&mut self, child: RawConfig) {
        self.compiler_options.extend(child.compiler_options);
        if child.include.is_some() {
            self.include = child.include;
        }
        if child.exclude.is_some() {
            self.exclude = child.exclude;
        }
        if child.files.is_some() {
            self.files = child.files;
        }
    }
}

fn extends_list(object: &Map<String, Value>) -> Vec<String> {
    match object.get("extends") {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Relative and absolute specifiers resolve against `dir`; bare ones are
/// looked up in `node_modules` of `dir` and its ancestors.
fn resolve_extends(spec: &str, dir: &Path) -> Option<PathBuf> {
    let candidates = |base: PathBuf| {
        let mut with_json = base.clone().into_os_string();
        with_json.push(".json");
        [base.clone(), PathBuf::from(with_json), base.join("tsconfig.json")]
    };

    if spec.starts_with('.') || Path::new(spec).is_absolute() {
        return candidates(normalize(&dir.join(spec)))
            .into_iter()
            .find(|p| p.is_file());
    }

    dir.ancestors()
        .map(|ancestor| ancestor.join("node_modules").join(spec))
        .flat_map(candidates)
        .find(|p| p.is_file())
}

fn compiler_options(object: &Map<String, Value>, dir: &Path) -> Map<String, Value> {
    let mut options = object
        .get("compilerOptions")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    for key in PATH_OPTIONS {
        if let Some(value) = options.get(*key).and_then(Value::as_str).map(str::to_string) {
            let absolute = normalize(&dir.join(value));
            options.insert(
                key.to_string(),
                Value::String(absolute.to_string_lossy().into_owned()),
            );
        }
    }
    // `paths` without `baseUrl` resolve against the config that declares them.
    if options.contains_key("paths") && !options.contains_key("baseUrl") {
        options.insert(
            "baseUrl".to_string(),
            Value::String(dir.to_string_lossy().into_owned()),
        );
    }
    options
}

fn path_list(object: &Map<String, Value>, key: &str, dir: &Path) -> Option<Vec<PathBuf>> {
    object.get(key).and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(|item| normalize(&dir.join(item)))
            .collect()
    })
}
