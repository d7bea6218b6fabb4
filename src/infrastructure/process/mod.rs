//! Child process management
//!
//! - `supervisor` - the restartable dev-mode application
//! - `run` - one-shot commands and scripts
//! - `launch` - environment overlay and loader preloads
//! - `port` - dev server port selection

mod launch;
mod port;
mod run;
mod supervisor;

pub use launch::{compose_node_options, EnvOverlay, Launch, RequireHooks};
pub use port::{find_free_port, resolve_port, FALLBACK_PORTS};
pub use run::{exit_code, resolve_target, run_once, RunTarget};
pub use supervisor::{ProcessState, ProcessSupervisor};
