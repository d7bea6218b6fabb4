//! Terminal output: capability detection, colors and the command logger.

pub mod json;
pub mod log;
pub mod primitives;
pub mod terminal;
pub mod theme;

pub use log::{Level, LogFormat, Logger, Timer};
