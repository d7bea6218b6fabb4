//! Supervises the dev-mode application process.
//!
//! At most one tracked child is live at a time. Stopping never blocks the
//! caller: killed children move to a retired list and are reaped later.

use std::path::PathBuf;
use std::process::{Child, Stdio};

use crate::domain::ports::{AppProcess, ExitSummary};
use crate::error::ProcessError;
use crate::ui::Logger;

use super::launch::Launch;

/// Observed state of the tracked child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Stopped,
    Running,
    /// Exited on its own; `None` when killed by a signal
    Exited(Option<i32>),
}

#[derive(Debug)]
struct SupervisedProcess {
    child: Child,
    killed: bool,
}

#[derive(Debug)]
pub struct ProcessSupervisor {
    launch: Launch,
    entry: Option<PathBuf>,
    current: Option<SupervisedProcess>,
    retired: Vec<SupervisedProcess>,
    exit_reported: bool,
    logger: Logger,
}

impl ProcessSupervisor {
    pub fn new(launch: Launch, entry: Option<PathBuf>, logger: Logger) -> Self {
        Self {
            launch,
            entry,
            current: None,
            retired: Vec::new(),
            exit_reported: false,
            logger,
        }
    }

    /// Start the application. Re-routes to [`restart`](Self::restart) when a
    /// tracked child is still live.
    pub fn start(&mut self) -> Result<(), ProcessError> {
        if self.is_live() {
            return self.restart();
        }
        self.logger.wait("starting server...");
        self.spawn()
    }

    /// `stop()` then spawn unconditionally
    pub fn restart(&mut self) -> Result<(), ProcessError> {
        self.logger.wait("restarting server...");
        self.stop();
        self.spawn()
    }

    /// Send a kill to the tracked child and forget it.
    ///
    /// Does not wait for the child to exit; use [`await_exit`](Self::await_exit)
    /// for that. No-op when nothing is tracked.
    pub fn stop(&mut self) {
        if let Some(mut process) = self.current.take() {
            // Already exited children reject the kill; that is fine.
            let _ = process.child.kill();
            process.killed = true;
            self.retired.push(process);
        }
        self.reap_finished();
    }

    /// Block until every stopped child has been reaped
    pub fn await_exit(&mut self) {
        for mut process in self.retired.drain(..) {
            let _ = process.child.wait();
        }
    }

    pub fn state(&mut self) -> ProcessState {
        match self.current.as_mut() {
            None => ProcessState::Stopped,
            Some(process) => match process.child.try_wait() {
                Ok(None) => ProcessState::Running,
                Ok(Some(status)) => ProcessState::Exited(status.code()),
                Err(_) => ProcessState::Stopped,
            },
        }
    }

    pub fn pid(&self) -> Option<u32> {
        self.current.as_ref().map(|p| p.child.id())
    }

    /// Children stopped but not yet reaped
    pub fn retired_count(&self) -> usize {
        self.retired.len()
    }

    /// Report the tracked child's own exit, once per spawn
    pub fn poll_exit(&mut self) -> Option<ExitSummary> {
        if self.exit_reported {
            return None;
        }
        match self.state() {
            ProcessState::Exited(code) => {
                self.exit_reported = true;
                Some(match code {
                    Some(0) => ExitSummary::Clean,
                    other => ExitSummary::Crashed(other),
                })
            }
            _ => None,
        }
    }

    fn is_live(&mut self) -> bool {
        let killed = self.current.as_ref().is_some_and(|p| p.killed);
        !killed && self.state() == ProcessState::Running
    }

    fn spawn(&mut self) -> Result<(), ProcessError> {
        let result = self.try_spawn();
        if let Err(err) = &result {
            self.logger.error(format!("server failed: {}", err));
        }
        result
    }

    fn try_spawn(&mut self) -> Result<(), ProcessError> {
        let entry = self.entry.as_ref().ok_or(ProcessError::MissingEntry)?;

        let mut command = self.launch.command(&self.launch.runtime);
        command
            .arg(entry)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = command.spawn().map_err(|source| ProcessError::Spawn {
            command: self.launch.runtime.clone(),
            source,
        })?;
        self.logger.debug(format!("spawned pid {}", child.id()));

        self.current = Some(SupervisedProcess {
            child,
            killed: false,
        });
        self.exit_reported = false;
        Ok(())
    }

    fn reap_finished(&mut self) {
        self.retired
            .retain_mut(|p| !matches!(p.child.try_wait(), Ok(Some(_))));
    }
}

impl AppProcess for ProcessSupervisor {
    fn start(&mut self) -> Result<(), ProcessError> {
        ProcessSupervisor::start(self)
    }

    fn restart(&mut self) -> Result<(), ProcessError> {
        ProcessSupervisor::restart(self)
    }

    fn stop(&mut self) {
        ProcessSupervisor::stop(self)
    }

    fn poll_exit(&mut self) -> Option<ExitSummary> {
        ProcessSupervisor::poll_exit(self)
    }
}

impl Drop for ProcessSupervisor {
    fn drop(&mut self) {
        self.stop();
        self.await_exit();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::infrastructure::process::EnvOverlay;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    /// `sleep 30` stands in for a long-running server
    fn sleeper() -> ProcessSupervisor {
        let launch = Launch::new("sleep", std::env::temp_dir(), EnvOverlay::new());
        ProcessSupervisor::new(launch, Some(PathBuf::from("30")), Logger::silent())
    }

    fn wait_for<T>(mut f: impl FnMut() -> Option<T>) -> Option<T> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Some(v) = f() {
                return Some(v);
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        None
    }

    #[test]
    fn start_spawns_one_child() {
        let mut sup = sleeper();
        sup.start().unwrap();
        assert_eq!(sup.state(), ProcessState::Running);
        assert!(sup.pid().is_some());
    }

    #[test]
    fn start_twice_restarts_instead_of_spawning_a_second_child() {
        let mut sup = sleeper();
        sup.start().unwrap();
        let first = sup.pid();

        sup.start().unwrap();

        assert_ne!(sup.pid(), first);
        assert_eq!(sup.state(), ProcessState::Running);
        sup.await_exit();
        assert_eq!(sup.retired_count(), 0);
    }

    #[test]
    fn stop_without_child_is_noop() {
        let mut sup = sleeper();
        sup.stop();
        assert_eq!(sup.state(), ProcessState::Stopped);
    }

    #[test]
    fn stop_does_not_block_and_await_exit_reaps() {
        let mut sup = sleeper();
        sup.start().unwrap();

        let started = Instant::now();
        sup.stop();
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(sup.state(), ProcessState::Stopped);

        sup.await_exit();
        assert_eq!(sup.retired_count(), 0);
    }

    #[test]
    fn missing_entry_leaves_supervisor_usable() {
        let launch = Launch::new("sleep", std::env::temp_dir(), EnvOverlay::new());
        let mut sup = ProcessSupervisor::new(launch, None, Logger::silent());

        assert!(matches!(sup.start(), Err(ProcessError::MissingEntry)));
        assert_eq!(sup.state(), ProcessState::Stopped);
    }

    #[test]
    fn spawn_failure_is_reported() {
        let launch = Launch::new("tsrig-no-such-runtime", std::env::temp_dir(), EnvOverlay::new());
        let mut sup = ProcessSupervisor::new(launch, Some(PathBuf::from("a.js")), Logger::silent());

        assert!(matches!(sup.start(), Err(ProcessError::Spawn { .. })));
    }

    #[test]
    fn crash_is_reported_once() {
        let dir = tempdir().unwrap();
        let script = dir.path().join("crash.sh");
        std::fs::write(&script, "exit 3\n").unwrap();
        let launch = Launch::new("sh", dir.path(), EnvOverlay::new());
        let mut sup = ProcessSupervisor::new(launch, Some(script), Logger::silent());

        sup.start().unwrap();
        let summary = wait_for(|| sup.poll_exit());

        assert_eq!(summary, Some(ExitSummary::Crashed(Some(3))));
        assert_eq!(sup.poll_exit(), None);
    }

    #[test]
    fn clean_exit_is_reported() {
        let dir = tempdir().unwrap();
        let script = dir.path().join("ok.sh");
        std::fs::write(&script, "exit 0\n").unwrap();
        let launch = Launch::new("sh", dir.path(), EnvOverlay::new());
        let mut sup = ProcessSupervisor::new(launch, Some(script), Logger::silent());

        sup.start().unwrap();

        assert_eq!(wait_for(|| sup.poll_exit()), Some(ExitSummary::Clean));
    }
}
