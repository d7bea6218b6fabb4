//! Supervised application port
//!
//! The dev loop drives the running application only through this trait.

use crate::error::ProcessError;

/// How the tracked child ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitSummary {
    /// Exit code 0
    Clean,
    /// Non-zero code, or killed by a signal (`None`)
    Crashed(Option<i32>),
}

pub trait AppProcess {
    /// Start the application; restarts it if it is already running.
    fn start(&mut self) -> Result<(), ProcessError>;

    /// Stop the current child (if any) and spawn a new one.
    fn restart(&mut self) -> Result<(), ProcessError>;

    /// Signal the current child to stop. Does not wait for it to exit.
    fn stop(&mut self);

    /// Report, once, that the tracked child exited on its own.
    fn poll_exit(&mut self) -> Option<ExitSummary>;
}

/// Injects the in-process source loader into the child's bootstrap.
///
/// The returned arguments are appended to the runtime's option variable
/// (`NODE_OPTIONS`), for example `--require @swc-node/register`.
pub trait SourceLoader: Send + Sync {
    fn preload_args(&self) -> Vec<String>;
}
