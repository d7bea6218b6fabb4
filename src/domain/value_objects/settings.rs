//! Project settings
//!
//! Normalized view of a tsconfig/jsconfig file. Built once per command by the
//! config loader and shared by reference with every component.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

/// How source maps are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMapMode {
    #[default]
    None,
    /// Separate `.map` file next to the output plus a `sourceMappingURL` trailer
    File,
    /// Embedded by the transpiler itself
    Inline,
}

/// Compiler options the tool reads, plus the untouched option bag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompileFlags {
    pub target: Option<String>,
    pub module: Option<String>,
    pub jsx: Option<String>,
    pub source_map: SourceMapMode,
    /// `paths` aliases, pattern -> replacement candidates
    pub paths: BTreeMap<String, Vec<String>>,
    /// Absolute `baseUrl`, resolved against the config directory
    pub base_url: Option<PathBuf>,
    /// Absolute `rootDir`, resolved against the config directory
    pub root_dir: Option<PathBuf>,
    pub allow_js: bool,
    pub resolve_json_module: bool,
    pub experimental_decorators: bool,
    /// Raw `compilerOptions`, forwarded as-is to collaborators
    pub raw: Map<String, Value>,
}

impl CompileFlags {
    /// Read the options this tool cares about out of a `compilerOptions` object.
    ///
    /// Relative directories are resolved against `config_dir`.
    pub fn from_compiler_options(options: &Map<String, Value>, config_dir: &Path) -> Self {
        let string = |key: &str| options.get(key).and_then(Value::as_str).map(str::to_string);
        let flag = |key: &str| options.get(key).and_then(Value::as_bool).unwrap_or(false);

        let source_map = if flag("inlineSourceMap") {
            SourceMapMode::Inline
        } else if flag("sourceMap") {
            SourceMapMode::File
        } else {
            SourceMapMode::None
        };

        let paths = options
            .get("paths")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .map(|(pattern, targets)| {
                        let targets = targets
                            .as_array()
                            .map(|list| {
                                list.iter()
                                    .filter_map(Value::as_str)
                                    .map(str::to_string)
                                    .collect()
                            })
                            .unwrap_or_default();
                        (pattern.clone(), targets)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            target: string("target").map(|t| t.to_lowercase()),
            module: string("module").map(|m| m.to_lowercase()),
            jsx: string("jsx"),
            source_map,
            paths,
            base_url: string("baseUrl").map(|p| config_dir.join(p)),
            root_dir: string("rootDir").map(|p| config_dir.join(p)),
            allow_js: flag("allowJs"),
            resolve_json_module: flag("resolveJsonModule"),
            experimental_decorators: flag("experimentalDecorators"),
            raw: options.clone(),
        }
    }

    /// Whether the project declares any path alias
    pub fn has_paths(&self) -> bool {
        !self.paths.is_empty()
    }
}

/// Normalized project configuration for one command invocation.
#[derive(Debug, Clone)]
pub struct ProjectSettings {
    /// Directory that relative include/exclude patterns resolve against
    pub root: PathBuf,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Absolute output directory
    pub out_dir: PathBuf,
    /// Config file the settings came from; `None` for built-in defaults
    pub config_path: Option<PathBuf>,
    pub flags: CompileFlags,
}

impl ProjectSettings {
    pub const DEFAULT_OUT_DIR: &'static str = "dist";

    /// Built-in defaults used when the project has no config file.
    pub fn defaults(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            include: vec!["src".to_string()],
            exclude: vec!["node_modules".to_string()],
            out_dir: root.join(Self::DEFAULT_OUT_DIR),
            config_path: None,
            flags: CompileFlags {
                target: Some("es2019".to_string()),
                module: Some("commonjs".to_string()),
                source_map: SourceMapMode::File,
                ..CompileFlags::default()
            },
        }
    }

    /// Override the output directory (relative paths resolve against `root`)
    pub fn with_out_dir(mut self, out_dir: impl AsRef<Path>) -> Self {
        self.out_dir = self.root.join(out_dir);
        self
    }

    /// Replace the include patterns
    pub fn with_include(mut self, include: Vec<String>) -> Self {
        self.include = include;
        self
    }
}
