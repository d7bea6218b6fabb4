//! Per-path quiescence tracking

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Collapses bursts of raw events into one report per path.
///
/// Time is passed in so the logic is testable without sleeping.
#[derive(Debug)]
pub struct Debouncer {
    quiescence: Duration,
    pending: HashMap<PathBuf, Instant>,
}

impl Debouncer {
    pub fn new(quiescence: Duration) -> Self {
        Self {
            quiescence,
            pending: HashMap::new(),
        }
    }

    /// Note a raw event for `path` at `now`, restarting its quiet period
    pub fn record(&mut self, path: PathBuf, now: Instant) {
        self.pending.insert(path, now);
    }

    /// Remove and return paths that have been quiet for the full window,
    /// oldest first.
    pub fn take_ready(&mut self, now: Instant) -> Vec<PathBuf> {
        let mut ready: Vec<(PathBuf, Instant)> = self
            .pending
            .iter()
            .filter(|(_, last)| now.saturating_duration_since(**last) >= self.quiescence)
            .map(|(path, last)| (path.clone(), *last))
            .collect();
        ready.sort_by_key(|(_, last)| *last);

        for (path, _) in &ready {
            self.pending.remove(path);
        }
        ready.into_iter().map(|(path, _)| path).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
