//! Watch event types and options

use std::path::PathBuf;
use std::time::Duration;

/// Quiescence window in milliseconds
pub const DEBOUNCE_MS: u64 = 100;

/// Startup settle window in milliseconds
pub const SETTLE_MS: u64 = 200;

/// Watch options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    /// A path is reported once no raw event for it arrived for this long
    pub quiescence: Duration,
    /// Startup window during which unchanged files produce no events
    pub settle: Duration,
    /// Receive timeout of the debounce loop
    pub poll: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            quiescence: Duration::from_millis(DEBOUNCE_MS),
            settle: Duration::from_millis(SETTLE_MS),
            poll: Duration::from_millis(50),
        }
    }
}

/// Debounced change notifications
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "event", content = "path", rename_all = "snake_case")]
pub enum WatchEvent {
    /// Initial scan complete; always the first event of a session
    Ready,
    Changed(PathBuf),
    Removed(PathBuf),
}

impl WatchEvent {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            WatchEvent::Ready => None,
            WatchEvent::Changed(path) | WatchEvent::Removed(path) => Some(path),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
