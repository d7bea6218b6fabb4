use crossterm::style::Color;

/// Design tokens for tsrig log output.
///
/// Design constraints:
/// - Only semantic colors (`colors::*`), no raw colors elsewhere
/// - Every log level maps to exactly one color (`Level::color`)
pub mod colors {
    use super::Color;

    /// #22C55E
    pub const SUCCESS: Color = Color::Green;
    /// #EF4444
    pub const ERROR: Color = Color::Red;
    /// #F59E0B
    pub const WARNING: Color = Color::Yellow;
    /// #06B6D4
    pub const INFO: Color = Color::Cyan;
    /// #6B7280
    pub const DIM: Color = Color::DarkGrey;
    /// #D946EF
    pub const PENDING: Color = Color::Magenta;
}

pub mod labels {
    pub const WAIT: &str = "wait";
    pub const EVENT: &str = "event";
    pub const INFO: &str = "info";
    pub const WARNING: &str = "warning";
    pub const ERROR: &str = "error";
    pub const DEBUG: &str = "debug";
}
