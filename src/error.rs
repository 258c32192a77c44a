//! Error types for campaign-deploy
//!
//! Uses `thiserror` for library errors. Every variant knows the pipeline
//! stage it aborts and the process exit code it maps to.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::value_objects::{Environment, ExclusionError, Stage};

/// Result type alias for deploy operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Exit code of a fully successful run
pub const EXIT_OK: i32 = 0;
/// Exit code of a run aborted by a fatal stage failure
pub const EXIT_FATAL: i32 = 1;
/// Exit code of a run whose containers were replaced but failed health checks
pub const EXIT_DEGRADED: i32 = 2;

#[derive(Error, Debug)]
pub enum DeployError {
    /// Environment name outside the known set
    #[error("invalid environment '{value}' (expected development, homolog or production)")]
    InvalidEnvironment { value: String },

    /// Required profile fields absent after merging config and overrides
    #[error("environment '{environment}' is missing required settings: {}", missing.join(", "))]
    IncompleteConfiguration {
        environment: Environment,
        missing: Vec<String>,
    },

    /// SSH key file not present locally
    #[error("ssh key for '{environment}' not found at {path}; run the credential setup for this environment first")]
    MissingCredential {
        environment: Environment,
        path: PathBuf,
    },

    /// Operation that only makes sense for a remote environment
    #[error("{operation} is not available for '{environment}'")]
    Unsupported {
        environment: Environment,
        operation: &'static str,
    },

    #[error("cannot reach {host}: {reason}")]
    UnreachableHost { host: String, reason: String },

    #[error("database unreachable from {host}: {reason}")]
    DatabaseUnreachable { host: String, reason: String },

    /// The probe command ran but printed no report it could be classified by
    #[error("database probe '{command}' gave no usable report: {reason}")]
    ProbeFailure { command: String, reason: String },

    #[error("required artifact '{artifact}' was not transferred: {reason}")]
    RequiredTransferFailure { artifact: PathBuf, reason: String },

    /// Image build failed; containers from the previous deploy are untouched
    #[error("image build for '{tag}' failed: {reason}")]
    ImageBuildFailure { tag: String, reason: String },

    #[error("migration step '{step}' failed: {reason}")]
    MigrationFailure { step: String, reason: String },

    #[error("container {operation} failed: {reason}")]
    ContainerFailure { operation: String, reason: String },

    #[error("another deploy to '{environment}' is in progress ({holder})")]
    DeployInProgress {
        environment: Environment,
        holder: String,
    },

    #[error("cannot take the deploy lock: {reason}")]
    LockFailure { reason: String },

    #[error("backup step '{step}' failed: {reason}")]
    BackupFailure { step: String, reason: String },

    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    #[error(transparent)]
    Exclusions(#[from] ExclusionError),

    #[error("local run of '{command}' failed: {message}")]
    LocalRun { command: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeployError {
    /// Pipeline stage this error aborted.
    pub fn stage(&self) -> Stage {
        match self {
            DeployError::InvalidEnvironment { .. }
            | DeployError::IncompleteConfiguration { .. }
            | DeployError::MissingCredential { .. }
            | DeployError::Unsupported { .. }
            | DeployError::InvalidConfig { .. } => Stage::Resolve,
            DeployError::UnreachableHost { .. } => Stage::Connect,
            DeployError::DeployInProgress { .. } | DeployError::LockFailure { .. } => Stage::Lock,
            DeployError::BackupFailure { .. } => Stage::Backup,
            DeployError::RequiredTransferFailure { .. } | DeployError::Exclusions(_) => {
                Stage::Transfer
            }
            DeployError::ImageBuildFailure { .. } => Stage::Build,
            DeployError::DatabaseUnreachable { .. } | DeployError::ProbeFailure { .. } => {
                Stage::Classify
            }
            DeployError::MigrationFailure { .. } => Stage::Migrate,
            DeployError::ContainerFailure { .. } => Stage::Containers,
            DeployError::LocalRun { .. } => Stage::LocalRun,
            DeployError::Io(_) => Stage::Resolve,
        }
    }

    pub fn exit_code(&self) -> i32 {
        EXIT_FATAL
    }

    /// Errors raised before any remote action was attempted.
    pub fn is_preflight(&self) -> bool {
        matches!(self.stage(), Stage::Resolve)
    }
}
