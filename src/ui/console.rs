//! Console Event Sink
//!
//! Renders `DeployEvent`s as timestamped log lines for an operator.

use std::io::{self, Write};
use std::sync::Mutex;

use campaign_deploy::domain::ports::{DeployEvent, DeployEventSink};

use crate::ui::context::UiContext;
use crate::ui::log::line;
use crate::ui::theme::Level;

pub struct ConsoleEventSink {
    ui: UiContext,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleEventSink {
    pub fn stdout(ui: UiContext) -> Self {
        Self::with_writer(ui, io::stdout())
    }

    pub fn with_writer<W: Write + Send + 'static>(ui: UiContext, writer: W) -> Self {
        Self {
            ui,
            writer: Mutex::new(Box::new(writer)),
        }
    }
}

/// Level and text for one event; `None` hides it.
pub fn render(event: &DeployEvent, verbose: bool) -> Option<(Level, String)> {
    let rendered = match event {
        DeployEvent::Started {
            environment,
            target,
        } => (Level::Info, format!("{} -> {}", environment, target)),
        DeployEvent::StageStarted { stage } => (Level::Info, format!("{}...", stage.label())),
        DeployEvent::Command { command } => {
            if !verbose {
                return None;
            }
            (Level::Dim, format!("$ {}", command))
        }
        DeployEvent::Info { message, .. } => (Level::Info, message.clone()),
        DeployEvent::Warning { stage, message } => {
            (Level::Warning, format!("[{}] {}", stage, message))
        }
        DeployEvent::Planned {
            files,
            excluded,
            fingerprint,
        } => (
            Level::Info,
            format!(
                "{} files planned, {} paths withheld (plan {})",
                files,
                excluded,
                fingerprint.get(..12).unwrap_or(fingerprint)
            ),
        ),
        DeployEvent::Excluded { path } => (Level::Dim, format!("withheld {}", path.display())),
        DeployEvent::ArtifactPushed {
            artifact,
            files,
            method,
        } => (
            Level::Success,
            format!("{} ({} files, {})", artifact.display(), files, method),
        ),
        DeployEvent::ArtifactSkipped { artifact, reason } => (
            Level::Warning,
            format!("{} skipped: {}", artifact.display(), reason),
        ),
        DeployEvent::StaleRemoved { artifact, files } => (
            Level::Info,
            format!("{}: removed {} stale remote files", artifact.display(), files),
        ),
        DeployEvent::ImageBuilt { tag } => (Level::Success, format!("image {} built", tag)),
        DeployEvent::DatabaseClassified { state } => {
            (Level::Info, format!("database state: {}", state))
        }
        DeployEvent::MigrationStep { step } => (Level::Info, format!("running {}", step)),
        DeployEvent::MigrationsSkipped { revision } => (
            Level::Success,
            format!(
                "schema already at {}, nothing to apply",
                revision.as_deref().unwrap_or("head")
            ),
        ),
        DeployEvent::VolumeCreated { name } => (Level::Info, format!("created volume {}", name)),
        DeployEvent::ContainerRemoved { name } => {
            (Level::Info, format!("removed container {}", name))
        }
        DeployEvent::ContainerStarted { name } => (Level::Success, format!("started {}", name)),
        DeployEvent::HealthAttempt {
            attempt,
            max,
            status,
        } => {
            let healthy = matches!(status, Some(code) if (200..300).contains(code));
            let answer = match status {
                Some(code) => format!("HTTP {}", code),
                None => "no answer".to_string(),
            };
            let level = if healthy { Level::Success } else { Level::Warning };
            (level, format!("health check {}/{}: {}", attempt, max, answer))
        }
        DeployEvent::BackupCreated { id, directory } => {
            (Level::Success, format!("backup {} stored in {}", id, directory))
        }
        DeployEvent::BackupsRotated { removed } => {
            if removed.is_empty() {
                return None;
            }
            (
                Level::Info,
                format!("rotated out {} old backup(s): {}", removed.len(), removed.join(", ")),
            )
        }
        DeployEvent::Completed {
            environment,
            degraded,
            warnings,
        } => {
            if *degraded {
                (
                    Level::Warning,
                    format!(
                        "{} deployed but unhealthy; operator attention required",
                        environment
                    ),
                )
            } else if *warnings > 0 {
                (
                    Level::Success,
                    format!("{} deployed with {} warning(s)", environment, warnings),
                )
            } else {
                (Level::Success, format!("{} deployed", environment))
            }
        }
    };
    Some(rendered)
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        let Some((level, message)) = render(&event, self.ui.verbose > 0) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line(level, &message, &self.ui));
            let _ = writer.flush();
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.ui.verbose > 0
    }
}
