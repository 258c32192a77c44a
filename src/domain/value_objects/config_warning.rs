//! Configuration warning value object.

use std::path::PathBuf;

/// Non-fatal problem found while loading `deploy.toml` (e.g. an unknown key).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Dotted path of the offending key, e.g. `environments.homolog.hots`
    pub key: String,
    pub file: PathBuf,
    /// 1-indexed line, when it could be located
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}
