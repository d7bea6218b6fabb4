//! `tsc` type checker adapter
//!
//! Runs `tsc --noEmit --pretty false` against a throwaway config that extends
//! the project config and lists only the requested files.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::{json, Value};

use crate::domain::ports::TypeChecker;
use crate::domain::value_objects::{Diagnostic, ProjectSettings, Severity};

/// File name prefix of the throwaway config
pub const CHECK_CONFIG_PREFIX: &str = ".tsconfig.tsrig-";

pub struct TscTypeChecker {
    executable: Option<PathBuf>,
}

impl TscTypeChecker {
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self { executable }
    }

    /// Find `tsc` for the project (see [`super::find_tool`])
    pub fn locate(project_root: &Path, configured: Option<&str>) -> Self {
        Self::new(super::find_tool("tsc", project_root, configured))
    }

    fn check_config(files: &[PathBuf], settings: &ProjectSettings) -> Value {
        let files: Vec<String> = files
            .iter()
            .map(|f| f.to_string_lossy().into_owned())
            .collect();

        match &settings.config_path {
            Some(config) => json!({
                "extends": config.to_string_lossy(),
                "files": files,
                "include": [],
                "compilerOptions": { "noEmit": true }
            }),
            None => {
                let mut options = settings.flags.raw.clone();
                if let Some(target) = &settings.flags.target {
                    options.entry("target").or_insert_with(|| json!(target));
                }
                if let Some(module) = &settings.flags.module {
                    options.entry("module").or_insert_with(|| json!(module));
                }
                options.insert("noEmit".to_string(), json!(true));
                json!({ "files": files, "include": [], "compilerOptions": options })
            }
        }
    }
}

impl TypeChecker for TscTypeChecker {
    fn diagnose(
        &self,
        files: &[PathBuf],
        settings: &ProjectSettings,
    ) -> Result<Vec<Diagnostic>, String> {
        if files.is_empty() {
            return Ok(Vec::new());
        }
        let tsc = self
            .executable
            .as_ref()
            .ok_or_else(|| "tsc not found (install typescript in the project)".to_string())?;

        // Next to the project config so default `typeRoots` resolve; the dot
        // keeps it out of the file set and the watcher.
        let dir = settings
            .config_path
            .as_ref()
            .and_then(|p| p.parent())
            .unwrap_or(&settings.root);
        let mut config = tempfile::Builder::new()
            .prefix(CHECK_CONFIG_PREFIX)
            .suffix(".json")
            .tempfile_in(dir)
            .map_err(|e| format!("failed to create temporary config: {}", e))?;
        config
            .write_all(Self::check_config(files, settings).to_string().as_bytes())
            .map_err(|e| format!("failed to write temporary config: {}", e))?;

        let output = Command::new(tsc)
            .current_dir(&settings.root)
            .arg("--project")
            .arg(config.path())
            .args(["--noEmit", "--pretty", "false"])
            .output()
            .map_err(|e| format!("failed to run {}: {}", tsc.display(), e))?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        let diagnostics = parse_tsc_output(&text, &settings.root);
        if diagnostics.is_empty() && !output.status.success() {
            return Ok(vec![Diagnostic::global(
                Severity::Error,
                format!("tsc exited with {}", output.status),
            )]);
        }
        Ok(diagnostics)
    }
}

/// Parse `--pretty false` output.
///
/// Located lines look like `src/a.ts(3,7): error TS2322: message`; global ones
/// like `error TS5023: message`. Indented lines continue the previous message.
pub fn parse_tsc_output(output: &str, cwd: &Path) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with(char::is_whitespace) {
            if let Some(last) = diagnostics.last_mut() {
                last.message.push('\n');
                last.message.push_str(line.trim_end());
            }
            continue;
        }
        if let Some(diag) = parse_located(line, cwd).or_else(|| parse_global(line)) {
            diagnostics.push(diag);
        }
    }

    diagnostics
}

fn parse_located(line: &str, cwd: &Path) -> Option<Diagnostic> {
    let colon = line.find("): ")?;
    let paren = line[..colon].rfind('(')?;

    let file = &line[..paren];
    let (line_num, column) = line[paren + 1..colon].split_once(',')?;
    let (severity, code, message) = parse_message(&line[colon + 3..])?;

    Some(Diagnostic {
        file: Some(cwd.join(file)),
        line: line_num.trim().parse().ok()?,
        column: column.trim().parse().ok()?,
        code,
        severity,
        message,
    })
}

fn parse_global(line: &str) -> Option<Diagnostic> {
    let (severity, code, message) = parse_message(line)?;
    Some(Diagnostic {
        code,
        ..Diagnostic::global(severity, message)
    })
}

/// `error TS2304: message`
fn parse_message(text: &str) -> Option<(Severity, Option<u32>, String)> {
    let (head, message) = text.split_once(": ")?;
    let mut words = head.split_whitespace();

    let severity = match words.next()? {
        "error" => Severity::Error,
        "warning" => Severity::Warning,
        "message" => Severity::Message,
        _ => return None,
    };
    let code = words
        .next()
        .and_then(|c| c.strip_prefix("TS"))
        .and_then(|c| c.parse().ok());

    Some((severity, code, message.to_string()))
}
