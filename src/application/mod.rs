//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on the domain layer (ports, services, value objects)
//! - Coordinates infrastructure adapters through those ports
//!
//! ## Use Cases
//!
//! - `BuildUseCase` - type check, clean, compile, rewrite aliases
//! - `DevOrchestrator` - watch, rebuild, restart
//!
//! ## Services
//!
//! - `CompileEngine` - every write into the output directory
//! - `TypeCheckGate` - pass/fail decision before compiling

pub mod build;
pub mod compile;
pub mod dev;
pub mod type_check;

pub use build::{BuildOptions, BuildOutcome, BuildUseCase};
pub use compile::{BuildReport, CompileEngine};
pub use dev::{coalesce, DevOptions, DevOrchestrator, DevState, Flow};
pub use type_check::{TypeCheckGate, TypeCheckOutcome};
