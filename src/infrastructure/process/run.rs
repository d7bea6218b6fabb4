//! One-shot execution for `tsrig run`

use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use crate::error::ProcessError;

use super::launch::Launch;

/// What `run` will execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunTarget {
    /// An executable found on `PATH`
    Executable(PathBuf),
    /// A project file, executed with the runtime
    Script(PathBuf),
}

/// Find `command` on `PATH` first, then as a project file.
pub fn resolve_target(command: &str, launch: &Launch) -> Result<RunTarget, ProcessError> {
    if let Ok(path) = which::which(command) {
        return Ok(RunTarget::Executable(path));
    }
    let file = launch.cwd.join(command);
    if file.is_file() {
        return Ok(RunTarget::Script(file));
    }
    Err(ProcessError::NotFound {
        command: command.to_string(),
    })
}

/// Run to completion with inherited stdio and return the exit code.
pub fn run_once(command: &str, args: &[String], launch: &Launch) -> Result<i32, ProcessError> {
    let mut child = build_command(&resolve_target(command, launch)?, args, launch);

    let status = child.status().map_err(|source| ProcessError::Spawn {
        command: command.to_string(),
        source,
    })?;
    Ok(exit_code(status))
}

fn build_command(target: &RunTarget, args: &[String], launch: &Launch) -> Command {
    let mut command = match target {
        RunTarget::Executable(path) => launch.command(path),
        RunTarget::Script(file) => {
            let mut command = launch.command(&launch.runtime);
            command.arg(file);
            command
        }
    };
    command.args(args);
    command
}

/// Exit code, or `128 + signal` when the child was killed by a signal
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::process::EnvOverlay;
    use tempfile::tempdir;

    fn launch(cwd: &std::path::Path, runtime: &str) -> Launch {
        Launch::new(runtime, cwd, EnvOverlay::new().set("TSRIG_TEST_VAR", "set"))
    }

    #[test]
    fn unknown_command_is_not_found() {
        let dir = tempdir().unwrap();
        let err = run_once("tsrig-no-such-command", &[], &launch(dir.path(), "node")).unwrap_err();
        assert!(matches!(err, ProcessError::NotFound { command } if command == "tsrig-no-such-command"));
    }

    #[test]
    fn project_file_runs_with_runtime() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("task.sh"), "exit 0\n").unwrap();

        let target = resolve_target("task.sh", &launch(dir.path(), "sh")).unwrap();
        assert_eq!(target, RunTarget::Script(dir.path().join("task.sh")));
    }

    #[cfg(unix)]
    #[test]
    fn exit_code_is_propagated() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("fail.sh"), "exit 7\n").unwrap();

        let code = run_once("fail.sh", &[], &launch(dir.path(), "sh")).unwrap();
        assert_eq!(code, 7);
    }

    #[cfg(unix)]
    #[test]
    fn overlay_and_args_reach_the_child() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("check.sh"),
            "[ \"$TSRIG_TEST_VAR\" = set ] && [ \"$1\" = hello ]\n",
        )
        .unwrap();

        let code = run_once("check.sh", &["hello".to_string()], &launch(dir.path(), "sh")).unwrap();
        assert_eq!(code, 0);
    }
}
