//! Domain Layer
//!
//! Pure types and rules without I/O dependencies.
//!
//! ## Structure
//!
//! - `value_objects/` - Settings, source files, diagnostics, hashes
//! - `services/` - Output path layout
//! - `ports/` - Interfaces for the external collaborators (type checker,
//!   transpiler, alias rewriter, file system, supervised application)

pub mod ports;
pub mod services;
pub mod value_objects;
