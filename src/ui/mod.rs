//! Terminal output: theme, capability detection, log lines, event sinks.

pub mod console;
pub mod context;
pub mod error;
pub mod json;
pub mod log;
pub mod output;
pub mod terminal;
pub mod theme;
