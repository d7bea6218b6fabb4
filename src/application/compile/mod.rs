//! Compile engine
//!
//! Owns every write into the output directory.

mod engine;
mod report;

pub use engine::CompileEngine;
pub use report::BuildReport;
