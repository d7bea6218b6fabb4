//! Command log output
//!
//! Human lines look like `12:04:31 event - compiled 12 files in 84.10 ms`.
//! With `--json` every line is an NDJSON record instead.

use std::fmt::Display;
use std::io::Write;
use std::time::Instant;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::domain::value_objects::Diagnostic;
use crate::ui::json;
use crate::ui::primitives::text::{ColoredText, SemanticColor};
use crate::ui::theme::labels;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Wait,
    Event,
    Info,
    Warning,
    Error,
    Debug,
}

impl Level {
    pub fn label(self) -> &'static str {
        match self {
            Level::Wait => labels::WAIT,
            Level::Event => labels::EVENT,
            Level::Info => labels::INFO,
            Level::Warning => labels::WARNING,
            Level::Error => labels::ERROR,
            Level::Debug => labels::DEBUG,
        }
    }

    fn color(self) -> SemanticColor {
        match self {
            Level::Wait => SemanticColor::Pending,
            Level::Event => SemanticColor::Success,
            Level::Info => SemanticColor::Info,
            Level::Warning => SemanticColor::Warning,
            Level::Error => SemanticColor::Error,
            Level::Debug => SemanticColor::Dim,
        }
    }

    fn is_problem(self) -> bool {
        matches!(self, Level::Warning | Level::Error)
    }
}

#[derive(Debug, Serialize)]
struct LogRecord<'a> {
    timestamp: DateTime<Local>,
    level: Level,
    message: &'a str,
}

/// How log lines are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
    /// Nothing is written (tests)
    Silent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Logger {
    format: LogFormat,
    color: bool,
    debug: bool,
}

impl Logger {
    pub fn new(format: LogFormat, color: bool, debug: bool) -> Self {
        Self {
            format,
            color,
            debug,
        }
    }

    pub fn silent() -> Self {
        Self::new(LogFormat::Silent, false, false)
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn is_json(&self) -> bool {
        self.format == LogFormat::Json
    }

    pub fn wait(&self, message: impl Display) {
        self.log(Level::Wait, message);
    }

    pub fn event(&self, message: impl Display) {
        self.log(Level::Event, message);
    }

    pub fn info(&self, message: impl Display) {
        self.log(Level::Info, message);
    }

    pub fn warn(&self, message: impl Display) {
        self.log(Level::Warning, message);
    }

    pub fn error(&self, message: impl Display) {
        self.log(Level::Error, message);
    }

    /// Only written in debug mode
    pub fn debug(&self, message: impl Display) {
        if self.debug {
            self.log(Level::Debug, message);
        }
    }

    /// One error line per diagnostic
    pub fn diagnostics(&self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            let level = if diagnostic.is_error() {
                Level::Error
            } else {
                Level::Warning
            };
            self.log(level, diagnostic);
        }
    }

    /// Log `label` as a wait line and start timing
    pub fn timer(&self, label: impl Display) -> Timer {
        self.wait(label);
        Timer {
            logger: *self,
            started: Instant::now(),
        }
    }

    pub fn log(&self, level: Level, message: impl Display) {
        let message = message.to_string();
        match self.format {
            LogFormat::Silent => {}
            LogFormat::Json => {
                let record = LogRecord {
                    timestamp: Local::now(),
                    level,
                    message: &message,
                };
                let _ = json::emit(&record);
            }
            LogFormat::Human => {
                let line = self.render(level, &message, Local::now());
                if level.is_problem() {
                    let _ = writeln!(std::io::stderr().lock(), "{}", line);
                } else {
                    let _ = writeln!(std::io::stdout().lock(), "{}", line);
                }
            }
        }
    }

    /// `HH:MM:SS <level> - message`
    pub fn render(&self, level: Level, message: &str, at: DateTime<Local>) -> String {
        let time = ColoredText::dim(at.format("%H:%M:%S").to_string());
        let label = ColoredText::new(level.label(), level.color()).bold();
        format!(
            "{} {} - {}",
            time.render(self.color),
            label.render(self.color),
            message
        )
    }
}

/// Measures one operation; see [`Logger::timer`]
#[derive(Debug)]
pub struct Timer {
    logger: Logger,
    started: Instant,
}

impl Timer {
    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// `<message> in 12.34 ms`
    pub fn end(self, message: impl Display) {
        let elapsed = self.elapsed_ms();
        self.logger
            .event(format!("{} in {:.2} ms", message, elapsed));
    }
}
