//! Scenario: `dev --type-check` on a project whose tsconfig has no `include`.
//!
//! The whole project directory is watched, so the checker's throwaway config
//! must not count as a project edit.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tsrig::application::{CompileEngine, DevOptions, DevOrchestrator, TypeCheckGate};
use tsrig::config::load_project;
use tsrig::domain::ports::{AppProcess, ExitSummary};
use tsrig::error::ProcessError;
use tsrig::infrastructure::fs::{FileMatcher, LocalFs};
use tsrig::infrastructure::tools::{TscTypeChecker, CHECK_CONFIG_PREFIX};
use tsrig::ui::Logger;
use tsrig::watcher::{ChangeWatcher, PathFilter, WatchOptions};

use crate::common::TestEnv;
use crate::support::PassThrough;

#[derive(Default, Clone)]
struct SpyProcess {
    journal: Arc<Mutex<Vec<&'static str>>>,
}

impl AppProcess for SpyProcess {
    fn start(&mut self) -> Result<(), ProcessError> {
        self.journal.lock().unwrap().push("start");
        Ok(())
    }

    fn restart(&mut self) -> Result<(), ProcessError> {
        self.journal.lock().unwrap().push("restart");
        Ok(())
    }

    fn stop(&mut self) {
        self.journal.lock().unwrap().push("stop");
    }

    fn poll_exit(&mut self) -> Option<ExitSummary> {
        None
    }
}

/// A `tsc` that records the config it was given and reports no diagnostics
fn fake_tsc(dir: &Path, log: &Path) -> std::path::PathBuf {
    let script = dir.join("tsc");
    fs::write(
        &script,
        format!("#!/bin/sh\necho \"$2\" >> '{}'\nsleep 0.2\n", log.display()),
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[test]
fn scenario_type_check_does_not_retrigger_itself() {
    let env = TestEnv::new();
    env.write("tsconfig.json", r#"{ "compilerOptions": { "outDir": "dist" } }"#)
        .write("index.ts", "export const port = 3000;\n")
        .write("config.json", "{}\n");

    let tools = tempfile::tempdir().unwrap();
    let log = tools.path().join("calls.log");
    let tsc = fake_tsc(tools.path(), &log);

    let root = env.project_root.path();
    let settings = load_project(root, Some(root.join("tsconfig.json").as_path())).unwrap();
    let matcher = FileMatcher::new(&settings).unwrap();
    let layout = matcher.layout(&settings);
    let roots = matcher.include().roots().to_vec();

    let gate = TypeCheckGate::new(TscTypeChecker::new(Some(tsc)), settings.clone(), Logger::silent());
    let engine = CompileEngine::new(PassThrough, LocalFs::new(), settings, layout, Logger::silent());
    let process = SpyProcess::default();
    let journal = Arc::clone(&process.journal);
    let options = DevOptions {
        type_check: true,
        port: None,
    };
    let mut orchestrator = DevOrchestrator::new(gate, engine, process, options, Logger::silent());

    let filter: PathFilter = Arc::new(move |path: &Path| matcher.classify_path(path).is_some());
    let watch = WatchOptions {
        settle: Duration::from_millis(150),
        ..WatchOptions::default()
    };
    let mut session = ChangeWatcher::start(&roots, filter, watch).unwrap();

    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_secs(3));
        flag.store(false, Ordering::SeqCst);
    });
    orchestrator.run(&mut session, &running);
    stopper.join().unwrap();

    let calls: Vec<String> = fs::read_to_string(&log)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    assert_eq!(calls.len(), 1, "tsc ran without edits: {:?}", calls);
    let config_name = Path::new(&calls[0]).file_name().unwrap().to_string_lossy().into_owned();
    assert!(config_name.starts_with(CHECK_CONFIG_PREFIX));
    assert_eq!(*journal.lock().unwrap(), vec!["start", "stop"]);

    let leftovers: Vec<_> = fs::read_dir(root)
        .unwrap()
        .flatten()
        .filter(|e| e.file_name().to_string_lossy().starts_with(CHECK_CONFIG_PREFIX))
        .collect();
    assert!(leftovers.is_empty());
}
