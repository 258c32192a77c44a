use crossterm::style::{Color, Stylize};

/// Design tokens for the campaign-deploy CLI.
///
/// Design constraints:
/// - Only 5 semantic colors (`colors::*`)
/// - All icons and log prefixes must be sourced from this module
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
}

pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const ERROR: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const PROGRESS: &str = "●";
    pub const ARROW: &str = "↳";
}

pub mod icons_ascii {
    pub const SUCCESS: &str = "[OK]";
    pub const ERROR: &str = "[FAIL]";
    pub const WARNING: &str = "[WARN]";
    pub const PROGRESS: &str = "[..]";
    pub const ARROW: &str = "->";
}

/// Severity of one log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
    Dim,
}

impl Level {
    pub fn color(&self) -> Color {
        match self {
            Level::Info => colors::INFO,
            Level::Success => colors::SUCCESS,
            Level::Warning => colors::WARNING,
            Level::Error => colors::ERROR,
            Level::Dim => colors::DIM,
        }
    }

    /// Fixed-width prefix so messages line up.
    pub fn prefix(&self) -> &'static str {
        match self {
            Level::Info => "INFO ",
            Level::Success => "OK   ",
            Level::Warning => "WARN ",
            Level::Error => "ERROR",
            Level::Dim => "     ",
        }
    }

    pub fn icon(&self, unicode: bool) -> &'static str {
        match (unicode, self) {
            (true, Level::Success) => icons::SUCCESS,
            (true, Level::Warning) => icons::WARNING,
            (true, Level::Error) => icons::ERROR,
            (true, Level::Info) => icons::PROGRESS,
            (true, Level::Dim) => icons::ARROW,
            (false, Level::Success) => icons_ascii::SUCCESS,
            (false, Level::Warning) => icons_ascii::WARNING,
            (false, Level::Error) => icons_ascii::ERROR,
            (false, Level::Info) => icons_ascii::PROGRESS,
            (false, Level::Dim) => icons_ascii::ARROW,
        }
    }
}

/// Apply `color` to `text` when color output is enabled.
pub fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        text.with(color).to_string()
    } else {
        text.to_string()
    }
}

/// Same as `paint`, bold.
pub fn paint_bold(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        text.with(color).bold().to_string()
    } else {
        text.to_string()
    }
}
