//! Common test utilities for tsrig CLI and scenario tests.
//!
//! `TestEnv` is an isolated project directory plus an isolated home, with
//! helpers to write project files and run the `tsrig` binary inside it.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

/// `tsconfig.json` compiling `src/**/*.ts` into `dist` without source maps
pub const TSCONFIG: &str = r#"{
  // comments are allowed
  "compilerOptions": {
    "outDir": "dist",
    "target": "es2019",
    "module": "commonjs",
  },
  "include": ["src/**/*.ts"],
}
"#;

/// Stand-in for esbuild: copies stdin into the `--outfile` target.
pub const FAKE_ESBUILD: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    --outfile=*) out="${arg#--outfile=}" ;;
  esac
done
cat > "$out"
"#;

/// Tool config pointing the transpiler at [`FAKE_ESBUILD`]
pub const TOOL_CONFIG: &str = r#"[tools]
transpiler = "fake-esbuild.sh"

[dev]
runtime = "sh"
preload = []
"#;

/// Result of running the tsrig binary
#[derive(Debug)]
pub struct TestResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated project and home directories
pub struct TestEnv {
    pub project_root: TempDir,
    pub home_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: TempDir::new().unwrap(),
            home_dir: TempDir::new().unwrap(),
        }
    }

    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    /// Write a project file, creating parent directories
    pub fn write(&self, relative: &str, content: &str) -> &Self {
        let path = self.project_path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
        self
    }

    #[cfg(unix)]
    pub fn write_executable(&self, relative: &str, content: &str) -> &Self {
        use std::os::unix::fs::PermissionsExt;

        self.write(relative, content);
        let path = self.project_path(relative);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        self
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.project_path(relative)).unwrap()
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.project_path(relative).exists()
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut command = Command::new(env!("CARGO_BIN_EXE_tsrig"));
        command
            .args(args)
            .current_dir(self.project_root.path())
            .env("HOME", self.home_dir.path())
            .env("XDG_CONFIG_HOME", self.home_dir.path().join(".config"))
            .env("NO_COLOR", "1")
            .env_remove("TSRIG_CONFIG")
            .env_remove("TSRIG_ENTRY")
            .env_remove("TSRIG_DEBUG")
            .env_remove("PORT")
            .env_remove("NODE_OPTIONS");
        for (key, value) in env_vars {
            command.env(key, value);
        }

        let output = command.output().unwrap();
        TestResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

