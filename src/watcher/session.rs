//! Watch sessions
//!
//! A `notify` watcher feeds raw paths into a channel; a background thread
//! filters, debounces and hash-checks them and forwards [`WatchEvent`]s.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use ignore::WalkBuilder;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::domain::value_objects::ContentHash;
use crate::error::WatchError;

use super::debounce::Debouncer;
use super::event::{WatchEvent, WatchOptions};

/// Decides which paths are delivered
pub type PathFilter = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

type Hashes = HashMap<PathBuf, ContentHash>;

pub struct ChangeWatcher;

impl ChangeWatcher {
    /// Watch `roots` recursively. Missing roots are skipped.
    ///
    /// Files that exist now are snapshotted first, so they are only reported
    /// once their content actually changes.
    pub fn start(
        roots: &[PathBuf],
        filter: PathFilter,
        options: WatchOptions,
    ) -> Result<WatchSession, WatchError> {
        let roots: Vec<PathBuf> = roots.iter().filter(|r| r.exists()).cloned().collect();
        let aliases = RootAliases::new(&roots);
        let hashes = snapshot(&roots, filter.as_ref());

        let (raw_tx, raw_rx) = mpsc::channel::<PathBuf>();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    if event.kind.is_access() {
                        return;
                    }
                    for path in event.paths {
                        let _ = raw_tx.send(path);
                    }
                }
            },
            Config::default(),
        )?;

        for root in &roots {
            watcher
                .watch(root, RecursiveMode::Recursive)
                .map_err(|e| WatchError::Path {
                    path: root.clone(),
                    message: e.to_string(),
                })?;
        }

        let (tx, rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(true));
        let worker = DebounceLoop {
            raw: raw_rx,
            out: tx,
            filter,
            aliases,
            hashes,
            options,
            running: Arc::clone(&running),
        };
        let thread = std::thread::Builder::new()
            .name("tsrig-watch".into())
            .spawn(move || worker.run())
            .map_err(|e| WatchError::Init(e.to_string()))?;

        Ok(WatchSession {
            events: rx,
            running,
            watcher: Some(watcher),
            thread: Some(thread),
        })
    }
}

/// A live watch; closed by [`stop`](Self::stop) or on drop
pub struct WatchSession {
    events: Receiver<WatchEvent>,
    running: Arc<AtomicBool>,
    watcher: Option<RecommendedWatcher>,
    thread: Option<JoinHandle<()>>,
}

impl WatchSession {
    /// A session fed by an arbitrary channel, with no OS watcher behind it
    pub fn from_channel(events: Receiver<WatchEvent>) -> Self {
        Self {
            events,
            running: Arc::new(AtomicBool::new(true)),
            watcher: None,
            thread: None,
        }
    }

    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Result<WatchEvent, RecvTimeoutError> {
        self.events.recv_timeout(timeout)
    }

    pub fn try_recv(&self) -> Result<WatchEvent, TryRecvError> {
        self.events.try_recv()
    }

    /// Stop watching. Safe to call more than once.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.watcher.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }

    pub fn is_stopped(&self) -> bool {
        !self.running.load(Ordering::SeqCst)
    }
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        self.stop();
    }
}

struct DebounceLoop {
    raw: Receiver<PathBuf>,
    out: Sender<WatchEvent>,
    filter: PathFilter,
    aliases: RootAliases,
    hashes: Hashes,
    options: WatchOptions,
    running: Arc<AtomicBool>,
}

impl DebounceLoop {
    fn run(mut self) {
        let mut debouncer = Debouncer::new(self.options.quiescence);

        // Settle: absorb the burst some backends emit on registration.
        let settle_end = Instant::now() + self.options.settle;
        while Instant::now() < settle_end && self.running.load(Ordering::SeqCst) {
            if let Ok(path) = self.raw.recv_timeout(self.options.poll) {
                self.accept(&mut debouncer, path);
            }
        }
        if self.out.send(WatchEvent::Ready).is_err() {
            return;
        }

        while self.running.load(Ordering::SeqCst) {
            match self.raw.recv_timeout(self.options.poll) {
                Ok(path) => {
                    self.accept(&mut debouncer, path);
                    while let Ok(path) = self.raw.try_recv() {
                        self.accept(&mut debouncer, path);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            for path in debouncer.take_ready(Instant::now()) {
                if let Some(event) = self.settle_path(path) {
                    if self.out.send(event).is_err() {
                        return;
                    }
                }
            }
        }
    }

    fn accept(&self, debouncer: &mut Debouncer, path: PathBuf) {
        let path = self.aliases.restore(path);
        if (self.filter)(&path) {
            debouncer.record(path, Instant::now());
        }
    }

    /// Turn a quiet path into an event, dropping unchanged content.
    fn settle_path(&mut self, path: PathBuf) -> Option<WatchEvent> {
        if path.is_file() {
            let bytes = std::fs::read(&path).ok()?;
            let hash = ContentHash::from_bytes(&bytes);
            if self.hashes.get(&path) == Some(&hash) {
                return None;
            }
            self.hashes.insert(path.clone(), hash);
            Some(WatchEvent::Changed(path))
        } else if !path.exists() {
            // Only files we reported or snapshotted count as removed.
            self.hashes
                .remove(&path)
                .map(|_| WatchEvent::Removed(path))
        } else {
            None
        }
    }
}

/// Hashes of every existing file under `roots` that passes `filter`
fn snapshot(roots: &[PathBuf], filter: &(dyn Fn(&Path) -> bool + Send + Sync)) -> Hashes {
    let mut hashes = Hashes::new();
    for root in roots {
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .hidden(true)
            .build();
        for entry in walker.flatten() {
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) || !filter(path) {
                continue;
            }
            if let Ok(bytes) = std::fs::read(path) {
                hashes.insert(path.to_path_buf(), ContentHash::from_bytes(&bytes));
            }
        }
    }
    hashes
}

/// Maps canonical paths reported by the OS back to the roots as given
/// (macOS reports `/private/var/...` for `/var/...`).
#[derive(Debug, Default)]
struct RootAliases {
    pairs: Vec<(PathBuf, PathBuf)>,
}

impl RootAliases {
    fn new(roots: &[PathBuf]) -> Self {
        let pairs = roots
            .iter()
            .filter_map(|root| {
                let canonical = root.canonicalize().ok()?;
                (canonical != *root).then(|| (canonical, root.clone()))
            })
            .collect();
        Self { pairs }
    }

    fn restore(&self, path: PathBuf) -> PathBuf {
        for (canonical, original) in &self.pairs {
            if let Ok(rest) = path.strip_prefix(canonical) {
                return original.join(rest);
            }
        }
        path
    }
}
