//! Timestamped operator log lines: `[HH:MM:SS] PREFIX message`.

use chrono::Local;

use crate::ui::context::UiContext;
use crate::ui::theme::{colors, paint, paint_bold, Level};

/// Render one line at `time`.
pub fn format_line(level: Level, message: &str, time: &str, color: bool) -> String {
    let stamp = paint(&format!("[{}]", time), colors::DIM, color);
    let prefix = match level {
        Level::Error => paint_bold(level.prefix(), level.color(), color),
        _ => paint(level.prefix(), level.color(), color),
    };
    let body = match level {
        Level::Dim => paint(message, colors::DIM, color),
        _ => message.to_string(),
    };
    format!("{} {} {}", stamp, prefix, body)
}

/// Render one line stamped with the local wall clock.
pub fn line(level: Level, message: &str, ui: &UiContext) -> String {
    format_line(level, message, &Local::now().format("%H:%M:%S").to_string(), ui.color)
}

pub fn info(ui: &UiContext, message: &str) {
    println!("{}", line(Level::Info, message, ui));
}

pub fn success(ui: &UiContext, message: &str) {
    println!("{}", line(Level::Success, message, ui));
}

pub fn warning(ui: &UiContext, message: &str) {
    eprintln!("{}", line(Level::Warning, message, ui));
}

pub fn error(ui: &UiContext, message: &str) {
    eprintln!("{}", line(Level::Error, message, ui));
}
