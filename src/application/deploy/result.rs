//! Deploy Result

use crate::application::backup::BackupOutcome;
use crate::application::containers::HealthOutcome;
use crate::domain::services::MigrationAction;
use crate::domain::value_objects::{DatabaseState, Environment, Fingerprint};
use crate::error::{EXIT_DEGRADED, EXIT_OK};

/// Result of a remote deploy that reached the end of the pipeline (or the
/// end of a dry run)
#[derive(Debug, Clone)]
pub struct DeployReport {
    pub environment: Environment,
    /// `user@host`
    pub target: String,
    pub dry_run: bool,
    pub files_planned: usize,
    pub files_pushed: usize,
    /// Stale remote files removed from mirrored directories
    pub files_removed: usize,
    pub excluded: usize,
    pub fingerprint: Fingerprint,
    pub backup: Option<BackupOutcome>,
    pub database: Option<DatabaseState>,
    pub migration: Option<MigrationAction>,
    pub health: Option<HealthOutcome>,
    pub warnings: Vec<String>,
}

impl DeployReport {
    /// Containers were replaced but never answered healthy.
    pub fn is_degraded(&self) -> bool {
        matches!(self.health, Some(HealthOutcome::Unhealthy { .. }))
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_degraded() {
            EXIT_DEGRADED
        } else {
            EXIT_OK
        }
    }
}

/// What a `deploy <env>` invocation did
#[derive(Debug, Clone)]
pub enum DeployOutcome {
    /// Development was handed to a local command
    Local {
        command: String,
        /// `None` for a dry run
        exit_code: Option<i32>,
    },
    Remote(DeployReport),
}

impl DeployOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            // The local command's status is passed through unchanged
            DeployOutcome::Local { exit_code, .. } => exit_code.unwrap_or(EXIT_OK),
            DeployOutcome::Remote(report) => report.exit_code(),
        }
    }
}
