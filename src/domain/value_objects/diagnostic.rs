//! Type-check diagnostics

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Message,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Message => "message",
        }
    }
}

/// One pre-emit diagnostic reported by the type checker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// `None` for project-wide diagnostics (bad option, missing file)
    pub file: Option<PathBuf>,
    /// 1-based
    pub line: u32,
    /// 1-based
    pub column: u32,
    pub code: Option<u32>,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    /// Diagnostic not tied to a location
    pub fn global(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            file: None,
            line: 0,
            column: 0,
            code: None,
            severity,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:{}:{} - ", file.display(), self.line, self.column)?;
        }
        write!(f, "{}", self.severity.as_str())?;
        if let Some(code) = self.code {
            write!(f, " TS{}", code)?;
        }
        write!(f, ": {}", self.message)
    }
}
