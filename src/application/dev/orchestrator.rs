//! Dev loop
//!
//! Reacts to watch events one cycle at a time:
//! - `Ready`: optional full type check, then start the application
//! - `Changed`: optional single-file check (compilable sources only),
//!   rebuild the file, restart
//! - `Removed`: delete the file's artifact, restart
//!
//! Events that pile up while a cycle runs are coalesced per path before the
//! next cycle. Nothing that fails inside a cycle ends the loop.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use crate::application::compile::CompileEngine;
use crate::application::type_check::{TypeCheckGate, TypeCheckOutcome};
use crate::domain::ports::{AppProcess, ExitSummary, FileSystem, Transpiler, TypeChecker};
use crate::domain::value_objects::FileKind;
use crate::ui::{json, Logger};
use crate::watcher::{WatchEvent, WatchSession};

/// How long the loop blocks on the watcher before polling the child
pub const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevState {
    Initializing,
    WaitingForReady,
    Watching,
    Rebuilding,
    Stopped,
}

/// Whether the loop keeps going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DevOptions {
    pub type_check: bool,
    /// Shown in the startup line only
    pub port: Option<u16>,
}

pub struct DevOrchestrator<C, T, FS, P>
where
    C: TypeChecker,
    T: Transpiler,
    FS: FileSystem,
    P: AppProcess,
{
    gate: TypeCheckGate<C>,
    engine: CompileEngine<T, FS>,
    process: P,
    options: DevOptions,
    logger: Logger,
    state: DevState,
}

impl<C, T, FS, P> DevOrchestrator<C, T, FS, P>
where
    C: TypeChecker,
    T: Transpiler,
    FS: FileSystem,
    P: AppProcess,
{
    pub fn new(
        gate: TypeCheckGate<C>,
        engine: CompileEngine<T, FS>,
        process: P,
        options: DevOptions,
        logger: Logger,
    ) -> Self {
        Self {
            gate,
            engine,
            process,
            options,
            logger,
            state: DevState::Initializing,
        }
    }

    pub fn state(&self) -> DevState {
        self.state
    }

    pub fn process(&self) -> &P {
        &self.process
    }

    pub fn engine(&self) -> &CompileEngine<T, FS> {
        &self.engine
    }

    pub fn gate(&self) -> &TypeCheckGate<C> {
        &self.gate
    }

    /// Drive the loop until `running` is cleared, the watcher goes away, or
    /// the application exits cleanly. Stops the watcher and the application
    /// on the way out.
    pub fn run(&mut self, session: &mut WatchSession, running: &AtomicBool) {
        self.state = DevState::WaitingForReady;

        while running.load(Ordering::SeqCst) {
            match session.recv_timeout(TICK) {
                Ok(first) => {
                    let mut pending = vec![first];
                    while let Ok(event) = session.try_recv() {
                        pending.push(event);
                    }
                    for event in coalesce(pending) {
                        self.handle(&event);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    self.logger.error("file watcher stopped unexpectedly");
                    break;
                }
            }

            if self.poll_process() == Flow::Stop {
                break;
            }
        }

        self.shutdown(session);
    }

    /// Run one cycle for `event`.
    pub fn handle(&mut self, event: &WatchEvent) {
        if self.logger.is_json() {
            let _ = json::emit(event);
        }

        match event {
            WatchEvent::Ready => self.on_ready(),
            WatchEvent::Changed(path) => self.cycle(path, true, |engine, path| {
                engine.build_one(path).map(|_| ())
            }),
            // A removed file cannot be type checked on its own.
            WatchEvent::Removed(path) => self.cycle(path, false, |engine, path| {
                engine.remove_one(path).map(|_| ())
            }),
        }
    }

    /// Log how the application ended, once per exit.
    ///
    /// A clean exit ends the dev loop; a crash keeps watching so the next
    /// edit can restart it.
    pub fn poll_process(&mut self) -> Flow {
        match self.process.poll_exit() {
            Some(ExitSummary::Clean) => {
                self.logger.event("server stopped");
                Flow::Stop
            }
            Some(ExitSummary::Crashed(code)) => {
                match code {
                    Some(code) => self.logger.error(format!("server crashed (exit code {})", code)),
                    None => self.logger.error("server crashed"),
                }
                Flow::Continue
            }
            None => Flow::Continue,
        }
    }

    pub fn shutdown(&mut self, session: &mut WatchSession) {
        self.logger.wait("shutting down...");
        session.stop();
        self.process.stop();
        self.state = DevState::Stopped;
    }

    fn on_ready(&mut self) {
        if self.state != DevState::WaitingForReady && self.state != DevState::Initializing {
            return;
        }
        self.state = DevState::Watching;

        if self.options.type_check {
            let Some(files) = self.project_files() else {
                return;
            };
            if !self.gate.check(&files).is_pass() {
                return;
            }
        }

        self.start_process();
    }

    fn cycle<F>(&mut self, path: &Path, check: bool, step: F)
    where
        F: FnOnce(&CompileEngine<T, FS>, &Path) -> Result<(), crate::error::CompileError>,
    {
        self.state = DevState::Rebuilding;
        self.logger.debug(format!("change: {}", path.display()));

        let wants_check =
            check && self.options.type_check && FileKind::of(path) == FileKind::Compilable;
        let checked = !wants_check || matches!(self.gate.check_one(path), TypeCheckOutcome::Pass);

        // Errors are already logged by the engine.
        if checked && step(&self.engine, path).is_ok() {
            if let Err(err) = self.process.restart() {
                self.logger.debug(format!("restart failed: {}", err));
            } else {
                self.log_started();
            }
        }

        self.state = DevState::Watching;
    }

    fn start_process(&mut self) {
        if self.process.start().is_ok() {
            self.log_started();
        }
    }

    fn log_started(&self) {
        match self.options.port {
            Some(port) => self.logger.event(format!("server started on port: {}", port)),
            None => self.logger.event("server started"),
        }
    }

    /// Compilable files of the project, for the startup type check
    fn project_files(&self) -> Option<Vec<PathBuf>> {
        use crate::infrastructure::fs::{FileMatcher, FileSetResolver};

        match FileMatcher::new(self.engine.settings()) {
            Ok(matcher) => Some(FileSetResolver::new(matcher).resolve().compile_paths()),
            Err(err) => {
                self.logger.error(err);
                None
            }
        }
    }
}

/// Keep only the newest event per path, in the order those newest events
/// arrived. `Ready` is always kept.
pub fn coalesce(events: Vec<WatchEvent>) -> Vec<WatchEvent> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut kept: Vec<WatchEvent> = events
        .into_iter()
        .rev()
        .filter(|event| match event.path() {
            Some(path) => seen.insert(path.clone()),
            None => true,
        })
        .collect();
    kept.reverse();
    kept
}
