//! File watcher for dev mode
//!
//! - Per-path quiescence (100ms)
//! - Startup settle window and content-hash snapshot, so existing files are
//!   not reported
//! - `Ready` strictly before any change
//! - Idempotent shutdown

mod debounce;
mod event;
mod session;

pub use debounce::Debouncer;
pub use event::{WatchEvent, WatchOptions, DEBOUNCE_MS, SETTLE_MS};
pub use session::{ChangeWatcher, PathFilter, WatchSession};
