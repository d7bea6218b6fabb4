//! Transpiler port
//!
//! A pure function from source text to output text. Implementations may call
//! out to an external tool but must not write into the output directory.

use std::path::Path;

use thiserror::Error;

use crate::domain::value_objects::CompileFlags;

/// One file to transform
#[derive(Debug, Clone, Copy)]
pub struct TransformRequest<'a> {
    pub path: &'a Path,
    pub source: &'a str,
    /// Where the code will be written; used for `sourceFileName`/`file` in maps
    pub output_path: &'a Path,
    pub flags: &'a CompileFlags,
}

/// Transformed code and, when maps are emitted as files, the map text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOutput {
    pub code: String,
    pub map: Option<String>,
}

#[derive(Error, Debug)]
pub enum TransformError {
    /// The source could not be transformed (syntax error and the like)
    #[error("{0}")]
    Rejected(String),

    /// The tool itself could not be run
    #[error("transpiler unavailable: {0}")]
    Unavailable(String),
}

pub trait Transpiler: Send + Sync {
    fn transform(&self, request: &TransformRequest<'_>) -> Result<TransformOutput, TransformError>;
}
