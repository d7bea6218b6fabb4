//! Dev Use Case
//!
//! Watch, rebuild, restart.

mod orchestrator;

pub use orchestrator::{coalesce, DevOptions, DevOrchestrator, DevState, Flow, TICK};
