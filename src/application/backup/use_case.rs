//! Backup Use Case
//!
//! Standalone `backup <env> <mode>`: resolve, connect, lock, capture.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;

use crate::application::resolve::{resolve, Resolution};
use crate::application::session;
use crate::config::{Config, CONFIG_FILE};
use crate::domain::entities::{BackupMode, ContainerSet};
use crate::domain::ports::{DeployEvent, DeployEventSink, NoopEventSink, RemoteConnector, RunLock};
use crate::domain::value_objects::{Environment, Stage};
use crate::error::{DeployError, DeployResult};

use super::capture::{local_backup_dir, run_backup, BackupOutcome, BackupRequest};

pub struct BackupUseCase<C>
where
    C: RemoteConnector,
{
    config: Config,
    project_root: PathBuf,
    connector: C,
    run_lock: Box<dyn RunLock>,
    events: Arc<dyn DeployEventSink>,
}

impl<C> BackupUseCase<C>
where
    C: RemoteConnector,
{
    pub fn new(
        config: Config,
        project_root: impl Into<PathBuf>,
        connector: C,
        run_lock: Box<dyn RunLock>,
    ) -> Self {
        Self {
            config,
            project_root: project_root.into(),
            connector,
            run_lock,
            events: Arc::new(NoopEventSink),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn DeployEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn execute(&self, environment: Environment, mode: BackupMode) -> DeployResult<BackupOutcome> {
        let events = self.events.as_ref();
        events.on_event(DeployEvent::StageStarted {
            stage: Stage::Resolve,
        });

        let profile = match resolve(&self.config, environment, &self.project_root)? {
            Resolution::Local(_) => {
                return Err(DeployError::Unsupported {
                    environment,
                    operation: "backup",
                })
            }
            Resolution::Remote(profile) => profile,
        };
        let layout = self.config.containers.layout(Path::new(CONFIG_FILE))?;
        let containers = ContainerSet::for_profile(&profile, &layout);

        events.on_event(DeployEvent::Started {
            environment,
            target: profile.target(),
        });

        let shell = session::connect(&self.connector, &profile, events)?;
        let _locks = session::lock(self.run_lock.as_ref(), shell.as_ref(), &profile, events)?;

        events.on_event(DeployEvent::StageStarted {
            stage: Stage::Backup,
        });
        let request = BackupRequest {
            profile: &profile,
            containers: &containers,
            mode,
            keep: self.config.deploy.backup_keep,
            log_tail: self.config.deploy.log_tail,
            dump_image: &self.config.migrations.dump_image,
            local_dir: local_backup_dir(&self.project_root, environment),
            created_at: Utc::now(),
        };
        run_backup(shell.as_ref(), &request, events)
    }
}
