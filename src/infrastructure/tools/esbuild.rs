//! `esbuild` transpiler adapter
//!
//! Feeds the source on stdin and lets esbuild write into a private temp
//! directory; the engine decides where the result finally goes.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde_json::{json, Value};

use crate::domain::ports::{TransformError, TransformOutput, TransformRequest, Transpiler};
use crate::domain::services::relative_to;
use crate::domain::value_objects::{CompileFlags, SourceMapMode};

const OUT_FILE: &str = "out.js";

pub struct EsbuildTranspiler {
    executable: Option<PathBuf>,
}

impl EsbuildTranspiler {
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self { executable }
    }

    /// Find `esbuild` for the project (see [`super::find_tool`])
    pub fn locate(project_root: &Path, configured: Option<&str>) -> Self {
        Self::new(super::find_tool("esbuild", project_root, configured))
    }

    fn args(request: &TransformRequest<'_>, out_file: &Path) -> Vec<String> {
        let flags = request.flags;
        let mut args = vec![
            format!("--sourcefile={}", request.path.display()),
            format!("--loader={}", loader_for(request.path)),
            format!("--format={}", format_for(request.path, flags)),
            "--platform=node".to_string(),
            "--log-level=error".to_string(),
            format!("--outfile={}", out_file.display()),
            format!("--tsconfig-raw={}", tsconfig_raw(flags)),
        ];
        if let Some(target) = flags.target.as_deref().filter(|t| t.starts_with("es")) {
            args.push(format!("--target={}", target));
        }
        match flags.source_map {
            SourceMapMode::None => {}
            SourceMapMode::File => args.push("--sourcemap".to_string()),
            SourceMapMode::Inline => args.push("--sourcemap=inline".to_string()),
        }
        args
    }
}

impl Transpiler for EsbuildTranspiler {
    fn transform(&self, request: &TransformRequest<'_>) -> Result<TransformOutput, TransformError> {
        let esbuild = self.executable.as_ref().ok_or_else(|| {
            TransformError::Unavailable("esbuild not found (install esbuild in the project)".into())
        })?;

        let scratch = tempfile::tempdir()
            .map_err(|e| TransformError::Unavailable(format!("temp dir: {}", e)))?;
        let out_file = scratch.path().join(OUT_FILE);

        let mut child = Command::new(esbuild)
            .args(Self::args(request, &out_file))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                TransformError::Unavailable(format!("failed to run {}: {}", esbuild.display(), e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(request.source.as_bytes())
                .map_err(|e| TransformError::Unavailable(e.to_string()))?;
        }
        let output = child
            .wait_with_output()
            .map_err(|e| TransformError::Unavailable(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(TransformError::Rejected(if stderr.is_empty() {
                format!("esbuild exited with {}", output.status)
            } else {
                stderr
            }));
        }

        let code = std::fs::read_to_string(&out_file)
            .map_err(|e| TransformError::Unavailable(format!("missing esbuild output: {}", e)))?;

        if request.flags.source_map != SourceMapMode::File {
            return Ok(TransformOutput { code, map: None });
        }

        let map = std::fs::read_to_string(scratch.path().join(format!("{}.map", OUT_FILE)))
            .map_err(|e| TransformError::Unavailable(format!("missing esbuild map: {}", e)))?;

        Ok(TransformOutput {
            code: strip_map_trailer(&code),
            map: Some(retarget_map(&map, request.path, request.output_path)),
        })
    }
}

fn loader_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ts" | "mts" | "cts") => "ts",
        Some("tsx") => "tsx",
        Some("jsx") => "jsx",
        _ => "js",
    }
}

fn format_for(path: &Path, flags: &CompileFlags) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("mts" | "mjs") => return "esm",
        Some("cts" | "cjs") => return "cjs",
        _ => {}
    }
    match flags.module.as_deref() {
        Some("es6" | "es2015" | "es2020" | "es2022" | "esnext") => "esm",
        _ => "cjs",
    }
}

/// The subset of compiler options esbuild honors
fn tsconfig_raw(flags: &CompileFlags) -> Value {
    let mut options = serde_json::Map::new();
    for key in [
        "experimentalDecorators",
        "emitDecoratorMetadata",
        "jsx",
        "jsxFactory",
        "jsxFragmentFactory",
        "jsxImportSource",
        "useDefineForClassFields",
        "importsNotUsedAsValues",
        "preserveValueImports",
        "verbatimModuleSyntax",
    ] {
        if let Some(value) = flags.raw.get(key) {
            options.insert(key.to_string(), value.clone());
        }
    }
    json!({ "compilerOptions": options })
}

fn strip_map_trailer(code: &str) -> String {
    let trimmed = code.trim_end();
    match trimmed.rfind("//# sourceMappingURL=") {
        Some(idx) if !trimmed[idx..].contains('\n') => {
            let mut code = trimmed[..idx].trim_end().to_string();
            code.push('\n');
            code
        }
        _ => code.to_string(),
    }
}

/// Point `file` and `sources` at the real output and source paths
fn retarget_map(map: &str, source: &Path, output: &Path) -> String {
    let Ok(mut value) = serde_json::from_str::<Value>(map) else {
        return map.to_string();
    };
    let out_dir = output.parent().unwrap_or_else(|| Path::new(""));
    let source_rel = relative_to(source, out_dir).to_string_lossy().replace('\\', "/");

    if let Some(object) = value.as_object_mut() {
        if let Some(name) = output.file_name() {
            object.insert("file".into(), json!(name.to_string_lossy()));
        }
        object.insert("sources".into(), json!([source_rel]));
    }
    value.to_string()
}
