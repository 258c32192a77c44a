//! JSON Event Sink
//!
//! Outputs deploy and backup events as NDJSON for CI/automation consumption.

use crate::domain::ports::{DeployEvent, DeployEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Command name stamped on every line
    command: &'static str,
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout(command: &'static str) -> Self {
        Self::with_writer(command, io::stdout())
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(command: &'static str, writer: W) -> Self {
        Self {
            command,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, mut event: serde_json::Value) {
        if let Some(map) = event.as_object_mut() {
            map.insert("command".to_string(), self.command.into());
        }
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

fn to_json(event: DeployEvent) -> serde_json::Value {
    match event {
        DeployEvent::Started {
            environment,
            target,
        } => serde_json::json!({
            "event": "start",
            "environment": environment.as_str(),
            "target": target,
        }),

        DeployEvent::StageStarted { stage } => serde_json::json!({
            "event": "stage",
            "stage": stage.as_str(),
        }),

        DeployEvent::Command { command } => serde_json::json!({
            "event": "remote_command",
            "remote_command": command,
        }),

        DeployEvent::Info { stage, message } => serde_json::json!({
            "event": "info",
            "stage": stage.as_str(),
            "message": message,
        }),

        DeployEvent::Warning { stage, message } => serde_json::json!({
            "event": "warning",
            "stage": stage.as_str(),
            "message": message,
        }),

        DeployEvent::Planned {
            files,
            excluded,
            fingerprint,
        } => serde_json::json!({
            "event": "planned",
            "files": files,
            "excluded": excluded,
            "fingerprint": fingerprint,
        }),

        DeployEvent::Excluded { path } => serde_json::json!({
            "event": "excluded",
            "path": path.display().to_string(),
        }),

        DeployEvent::ArtifactPushed {
            artifact,
            files,
            method,
        } => serde_json::json!({
            "event": "artifact_pushed",
            "artifact": artifact.display().to_string(),
            "files": files,
            "method": method,
        }),

        DeployEvent::ArtifactSkipped { artifact, reason } => serde_json::json!({
            "event": "artifact_skipped",
            "artifact": artifact.display().to_string(),
            "reason": reason,
        }),

        DeployEvent::StaleRemoved { artifact, files } => serde_json::json!({
            "event": "stale_removed",
            "artifact": artifact.display().to_string(),
            "files": files,
        }),

        DeployEvent::ImageBuilt { tag } => serde_json::json!({
            "event": "image_built",
            "tag": tag,
        }),

        DeployEvent::DatabaseClassified { state } => serde_json::json!({
            "event": "database_classified",
            "state": state.name(),
            "detail": state.to_string(),
        }),

        DeployEvent::MigrationStep { step } => serde_json::json!({
            "event": "migration_step",
            "step": step,
        }),

        DeployEvent::MigrationsSkipped { revision } => serde_json::json!({
            "event": "migrations_skipped",
            "revision": revision,
        }),

        DeployEvent::VolumeCreated { name } => serde_json::json!({
            "event": "volume_created",
            "name": name,
        }),

        DeployEvent::ContainerRemoved { name } => serde_json::json!({
            "event": "container_removed",
            "name": name,
        }),

        DeployEvent::ContainerStarted { name } => serde_json::json!({
            "event": "container_started",
            "name": name,
        }),

        DeployEvent::HealthAttempt {
            attempt,
            max,
            status,
        } => serde_json::json!({
            "event": "health_attempt",
            "attempt": attempt,
            "max": max,
            "status": status,
        }),

        DeployEvent::BackupCreated { id, directory } => serde_json::json!({
            "event": "backup_created",
            "id": id,
            "directory": directory,
        }),

        DeployEvent::BackupsRotated { removed } => serde_json::json!({
            "event": "backups_rotated",
            "removed": removed,
        }),

        DeployEvent::Completed {
            environment,
            degraded,
            warnings,
        } => {
            let status = if degraded { "degraded" } else { "success" };
            serde_json::json!({
                "event": "complete",
                "environment": environment.as_str(),
                "status": status,
                "warnings": warnings,
            })
        }
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        self.write_event(to_json(event));
    }

    fn wants_detailed_events(&self) -> bool {
        true // JSON mode wants all events
    }
}
