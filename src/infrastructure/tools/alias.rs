//! Native `paths` alias rewriting
//!
//! Emitted code still says `require("@/lib/db")`. This rewrites every
//! specifier that matches a `compilerOptions.paths` pattern into a relative
//! path between emitted files, so the output runs without a resolver hook.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use ignore::WalkBuilder;
use regex::{Captures, Regex};

use crate::domain::ports::AliasRewriter;
use crate::domain::services::{normalize, relative_to, OutputLayout};
use crate::domain::value_objects::{FileKind, ProjectSettings};
use crate::error::CompileError;

/// `require("x")`, `import("x")`, `from "x"`, `import "x"`
static SPECIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<head>\brequire\s*\(\s*|\bimport\s*\(\s*|\bfrom\s*|\bimport\s+)(?P<quote>["'])(?P<spec>[^"'\r\n]+)["']"#)
        .unwrap_or_else(|e| panic!("invalid specifier regex: {e}"))
});

const EMITTED_EXTENSIONS: &[&str] = &["js", "mjs", "cjs"];

/// Probed when an alias target has no extension
const PROBE_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs", "json",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct PathAliasRewriter;

impl PathAliasRewriter {
    pub fn new() -> Self {
        Self
    }

    /// Rewrite the specifiers in `code`, emitted at `emitted`.
    ///
    /// Returns `None` when nothing changed.
    pub fn rewrite_source(
        &self,
        code: &str,
        emitted: &Path,
        settings: &ProjectSettings,
        layout: &OutputLayout,
    ) -> Option<String> {
        let mut changed = false;
        let rewritten = SPECIFIER.replace_all(code, |caps: &Captures<'_>| {
            let spec = &caps["spec"];
            match resolve_alias(spec, emitted, settings, layout) {
                Some(relative) => {
                    changed = true;
                    format!("{}{}{}{}", &caps["head"], &caps["quote"], relative, &caps["quote"])
                }
                None => caps[0].to_string(),
            }
        });
        changed.then(|| rewritten.into_owned())
    }
}

impl AliasRewriter for PathAliasRewriter {
    fn rewrite_dir(
        &self,
        settings: &ProjectSettings,
        layout: &OutputLayout,
    ) -> Result<usize, CompileError> {
        if !settings.flags.has_paths() || !layout.out_dir().exists() {
            return Ok(0);
        }

        let mut changed = 0;
        for entry in WalkBuilder::new(layout.out_dir())
            .standard_filters(false)
            .build()
            .flatten()
        {
            let path = entry.path();
            let emitted = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| EMITTED_EXTENSIONS.contains(&e));
            if emitted && entry.file_type().is_some_and(|t| t.is_file()) {
                if self.rewrite_file(path, settings, layout)? {
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }

    fn rewrite_file(
        &self,
        emitted: &Path,
        settings: &ProjectSettings,
        layout: &OutputLayout,
    ) -> Result<bool, CompileError> {
        if !settings.flags.has_paths() {
            return Ok(false);
        }
        let code = std::fs::read_to_string(emitted).map_err(|e| CompileError::AliasRewrite {
            message: format!("{}: {}", emitted.display(), e),
        })?;

        match self.rewrite_source(&code, emitted, settings, layout) {
            Some(rewritten) => {
                std::fs::write(emitted, rewritten).map_err(|e| CompileError::AliasRewrite {
                    message: format!("{}: {}", emitted.display(), e),
                })?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Relative specifier for an aliased import, or `None` if `spec` is not an alias
/// or its target cannot be found.
fn resolve_alias(
    spec: &str,
    emitted: &Path,
    settings: &ProjectSettings,
    layout: &OutputLayout,
) -> Option<String> {
    if spec.starts_with('.') || spec.starts_with('/') {
        return None;
    }
    let base = settings.flags.base_url.as_deref().unwrap_or(&settings.root);

    let mut patterns: Vec<_> = settings.flags.paths.iter().collect();
    // Longest literal prefix wins, as in the compiler.
    patterns.sort_by_key(|(pattern, _)| std::cmp::Reverse(pattern.find('*').unwrap_or(pattern.len())));

    for (pattern, targets) in patterns {
        let Some(capture) = match_pattern(pattern, spec) else {
            continue;
        };
        for target in targets {
            let candidate = normalize(&base.join(target.replacen('*', capture, 1)));
            if let Some(resolved) = probe(&candidate) {
                return Some(specifier_for(&resolved, emitted, layout));
            }
        }
    }
    None
}

/// `@/*` against `@/lib/db` captures `lib/db`; exact patterns capture `""`.
fn match_pattern<'a>(pattern: &str, spec: &'a str) -> Option<&'a str> {
    match pattern.split_once('*') {
        Some((prefix, suffix)) => {
            if spec.len() >= prefix.len() + suffix.len()
                && spec.starts_with(prefix)
                && spec.ends_with(suffix)
            {
                Some(&spec[prefix.len()..spec.len() - suffix.len()])
            } else {
                None
            }
        }
        None => (pattern == spec).then_some(""),
    }
}

/// How an alias target was found on disk
enum Resolved {
    /// The path as written, extension included
    Exact(PathBuf),
    /// Found by appending an extension; the specifier stays extensionless
    WithExtension(PathBuf),
    /// `<dir>/index.<ext>`; the specifier names the directory
    Index(PathBuf),
}

fn probe(candidate: &Path) -> Option<Resolved> {
    if candidate.is_file() {
        return Some(Resolved::Exact(candidate.to_path_buf()));
    }
    for ext in PROBE_EXTENSIONS {
        let mut name = candidate.as_os_str().to_owned();
        name.push(".");
        name.push(ext);
        let path = PathBuf::from(name);
        if path.is_file() {
            return Some(Resolved::WithExtension(path));
        }
    }
    if candidate.is_dir() {
        for ext in PROBE_EXTENSIONS {
            let path = candidate.join(format!("index.{}", ext));
            if path.is_file() {
                return Some(Resolved::Index(path));
            }
        }
    }
    None
}

fn specifier_for(resolved: &Resolved, emitted: &Path, layout: &OutputLayout) -> String {
    let output = |source: &Path| {
        let ext = (FileKind::of(source) == FileKind::Compilable).then_some("js");
        layout.output_path_for(source, ext)
    };

    let target = match resolved {
        Resolved::Exact(source) => output(source),
        Resolved::WithExtension(source) => {
            let out = output(source);
            if FileKind::of(source) == FileKind::Compilable {
                out.with_extension("")
            } else {
                out
            }
        }
        Resolved::Index(source) => {
            let out = output(source);
            out.parent().map(Path::to_path_buf).unwrap_or(out)
        }
    };

    let from = emitted.parent().unwrap_or_else(|| Path::new(""));
    let relative = relative_to(&target, from).to_string_lossy().replace('\\', "/");
    if relative.is_empty() {
        ".".to_string()
    } else if relative.starts_with("..") {
        relative
    } else {
        format!("./{}", relative)
    }
}
