//! Database state value objects
//!
//! The probe bundled in the application image reports what it found either
//! as one JSON object or as the status marker lines of
//! `scripts/check_database.py`. `ProbeReport` is that report; `DatabaseState`
//! is the classification derived from it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Structured report printed by the database probe.
///
/// ```json
/// {"connected": true, "history_table": true,
///  "current_revision": "0341e76f5bd0", "head_revision": "1c5791e05eea",
///  "pending": ["1c5791e05eea"]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProbeReport {
    pub connected: bool,
    /// Whether the migration-history table exists
    #[serde(default)]
    pub history_table: bool,
    #[serde(default)]
    pub current_revision: Option<String>,
    /// Latest migration script bundled in the image
    #[serde(default)]
    pub head_revision: Option<String>,
    #[serde(default)]
    pub pending: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Status markers printed by `scripts/check_database.py`
const MARKER_NO_DATABASE: &str = "BANCO_NAO_EXISTE";
const MARKER_FIRST_INSTALL: &str = "PRIMEIRA_INSTALACAO";
const MARKER_PENDING: &str = "MIGRACOES_PENDENTES";
const MARKER_CURRENT: &str = "BANCO_ATUALIZADO";
const LABEL_REVISION: &str = "Revisão atual:";
const LABEL_CONNECT_ERROR: &str = "Erro ao conectar no banco:";

impl ProbeReport {
    /// Parse the probe output.
    ///
    /// The probe may print log noise before its report, so the last line
    /// that parses as a JSON object wins. Output without JSON is read as
    /// status markers.
    pub fn parse(stdout: &str) -> Option<Self> {
        stdout
            .lines()
            .rev()
            .map(str::trim)
            .filter(|line| line.starts_with('{'))
            .find_map(|line| serde_json::from_str(line).ok())
            .or_else(|| Self::parse_markers(stdout))
    }

    /// Marker output: one status line, then the recorded revision and, when
    /// behind, up to five pending revisions listed head first.
    fn parse_markers(stdout: &str) -> Option<Self> {
        let lines: Vec<&str> = stdout.lines().map(str::trim).collect();
        let has = |marker: &str| lines.iter().any(|line| line.ends_with(marker));
        let value = |label: &str| {
            lines
                .iter()
                .find_map(|line| line.split_once(label))
                .map(|(_, rest)| rest.trim().to_string())
                .filter(|rest| !rest.is_empty() && rest != "None")
        };

        if has(MARKER_NO_DATABASE) {
            return Some(Self {
                connected: false,
                error: value(LABEL_CONNECT_ERROR).or_else(|| Some(MARKER_NO_DATABASE.to_string())),
                ..Default::default()
            });
        }
        if has(MARKER_FIRST_INSTALL) {
            return Some(Self {
                connected: true,
                ..Default::default()
            });
        }

        let current = value(LABEL_REVISION);
        if has(MARKER_PENDING) {
            let listed: Vec<String> = lines
                .iter()
                .filter_map(|line| line.strip_prefix("- "))
                .map(|rev| rev.trim().to_string())
                .collect();
            let head = listed.first().cloned()?;
            return Some(Self {
                connected: true,
                history_table: true,
                current_revision: current,
                head_revision: Some(head),
                pending: listed.into_iter().rev().collect(),
                error: None,
            });
        }
        if has(MARKER_CURRENT) {
            return Some(Self {
                connected: true,
                history_table: true,
                head_revision: current.clone(),
                current_revision: current,
                ..Default::default()
            });
        }
        None
    }
}

/// Result of running the probe container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The probe ran and produced a report
    Report(ProbeReport),
    /// The probe could not run or its output was unusable
    Failed { reason: String },
}

/// Classification of the remote database, one per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DatabaseState {
    /// Connection failed (timeout, auth error, probe failure)
    Unreachable { reason: String },
    /// Connected, but no migration-history table exists
    Uninitialized,
    /// History exists and its recorded head is behind the latest script
    PendingMigrations {
        current: Option<String>,
        head: String,
        pending: Vec<String>,
    },
    /// Recorded head equals the latest script
    Current { revision: Option<String> },
}

impl DatabaseState {
    pub fn name(&self) -> &'static str {
        match self {
            DatabaseState::Unreachable { .. } => "UNREACHABLE",
            DatabaseState::Uninitialized => "UNINITIALIZED",
            DatabaseState::PendingMigrations { .. } => "PENDING_MIGRATIONS",
            DatabaseState::Current { .. } => "CURRENT",
        }
    }

    pub fn is_reachable(&self) -> bool {
        !matches!(self, DatabaseState::Unreachable { .. })
    }
}

impl fmt::Display for DatabaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseState::Unreachable { reason } => write!(f, "{} ({})", self.name(), reason),
            DatabaseState::Uninitialized => f.write_str(self.name()),
            DatabaseState::PendingMigrations { current, head, .. } => write!(
                f,
                "{} ({} -> {})",
                self.name(),
                current.as_deref().unwrap_or("<none>"),
                head
            ),
            DatabaseState::Current { revision } => write!(
                f,
                "{} ({})",
                self.name(),
                revision.as_deref().unwrap_or("<no migrations>")
            ),
        }
    }
}
