//! Deploy Event Port
//!
//! Observable interface for deploy and backup runs. The console sink renders
//! timestamped operator lines; the JSON sink streams NDJSON for CI.

use std::path::PathBuf;

use crate::domain::value_objects::{DatabaseState, Environment, Stage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployEvent {
    /// Run started
    Started {
        environment: Environment,
        target: String,
    },

    /// A pipeline stage started
    StageStarted { stage: Stage },

    /// Remote command about to run (detailed sinks only)
    Command { command: String },

    /// Informational progress line
    Info { stage: Stage, message: String },

    /// Non-fatal problem, run continues
    Warning { stage: Stage, message: String },

    /// Transfer plan computed
    Planned {
        files: usize,
        excluded: usize,
        fingerprint: String,
    },

    /// Path withheld by the exclusion list
    Excluded { path: PathBuf },

    /// Artifact pushed
    ArtifactPushed {
        artifact: PathBuf,
        files: usize,
        method: &'static str,
    },

    /// Optional artifact skipped
    ArtifactSkipped { artifact: PathBuf, reason: String },

    /// Remote files under a mirrored directory that no longer exist locally
    StaleRemoved { artifact: PathBuf, files: usize },

    ImageBuilt { tag: String },

    DatabaseClassified { state: DatabaseState },

    /// Migration step started inside a throwaway container
    MigrationStep { step: &'static str },

    /// Database already at head; nothing applied
    MigrationsSkipped { revision: Option<String> },

    VolumeCreated { name: String },

    ContainerRemoved { name: String },

    ContainerStarted { name: String },

    HealthAttempt {
        attempt: u32,
        max: u32,
        status: Option<u16>,
    },

    BackupCreated { id: String, directory: String },

    /// Backups removed by rotation
    BackupsRotated { removed: Vec<String> },

    /// Run completed; `degraded` means containers were replaced but are unhealthy
    Completed {
        environment: Environment,
        degraded: bool,
        warnings: usize,
    },
}

pub trait DeployEventSink: Send + Sync {
    fn on_event(&self, event: DeployEvent);

    /// Check if this sink wants detailed events (e.g., remote commands)
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
