//! Domain Services
//!
//! Stateless, I/O-free logic shared by the application layer.

pub mod output_layout;

pub use output_layout::{common_ancestor, map_path_for, normalize, relative_to, OutputLayout};
