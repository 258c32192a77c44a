//! Deploy Use Case
//!
//! Orchestrates one linear run against one environment:
//! 1. Resolve the environment (development short-circuits to a local run)
//! 2. Plan the transfer (missing required artifacts fail here)
//! 3. Connect and take the run locks
//! 4. Back up (production by default)
//! 5. Push files, build the image
//! 6. Classify the database and apply the matching migration action
//! 7. Replace containers and verify health
//!
//! Each step is a checkpoint: the first fatal error returns immediately and
//! nothing after it runs. A run interrupted between steps 5 and 7 can leave
//! the remote host half-updated; the remote lock directory stays behind to
//! flag it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;

use crate::application::backup::{local_backup_dir, run_backup, BackupOutcome, BackupRequest};
use crate::application::containers::{replace_containers, verify_health, HealthPolicy};
use crate::application::migrations::{apply_migrations, inspect_database};
use crate::application::remote::exec_ok;
use crate::application::resolve::{resolve, Resolution};
use crate::application::session;
use crate::application::transfer::{execute_transfer, plan_for_profile, TransferTarget};
use crate::config::{Config, CONFIG_FILE};
use crate::domain::entities::{BackupMode, ContainerSet, EnvironmentProfile};
use crate::domain::ports::{
    DeployEvent, DeployEventSink, LocalRunner, NoopEventSink, RemoteConnector, RunLock,
    TransferStrategy,
};
use crate::domain::services::DockerCommands;
use crate::domain::value_objects::{DatabaseState, Stage};
use crate::error::{DeployError, DeployResult};

use super::options::DeployOptions;
use super::result::{DeployOutcome, DeployReport};

/// Deploy use case - orchestrates the deployment flow
///
/// Parameterized by its ports so tests drive it with in-memory fakes.
pub struct DeployUseCase<C, L>
where
    C: RemoteConnector,
    L: LocalRunner,
{
    config: Config,
    project_root: PathBuf,
    connector: C,
    local_runner: L,
    transfers: Vec<Box<dyn TransferStrategy>>,
    run_lock: Box<dyn RunLock>,
    events: Arc<dyn DeployEventSink>,
}

impl<C, L> DeployUseCase<C, L>
where
    C: RemoteConnector,
    L: LocalRunner,
{
    pub fn new(
        config: Config,
        project_root: impl Into<PathBuf>,
        connector: C,
        local_runner: L,
        transfers: Vec<Box<dyn TransferStrategy>>,
        run_lock: Box<dyn RunLock>,
    ) -> Self {
        Self {
            config,
            project_root: project_root.into(),
            connector,
            local_runner,
            transfers,
            run_lock,
            events: Arc::new(NoopEventSink),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn DeployEventSink>) -> Self {
        self.events = events;
        self
    }

    /// Execute the deploy use case
    pub fn execute(&self, options: &DeployOptions) -> DeployResult<DeployOutcome> {
        let events = self.events.as_ref();
        events.on_event(DeployEvent::StageStarted {
            stage: Stage::Resolve,
        });

        match resolve(&self.config, options.environment, &self.project_root)? {
            Resolution::Local(run) => self.run_local(run.command, options.dry_run),
            Resolution::Remote(profile) => self
                .run_remote(&profile, options)
                .map(DeployOutcome::Remote),
        }
    }

    fn run_local(&self, command: String, dry_run: bool) -> DeployResult<DeployOutcome> {
        let events = self.events.as_ref();
        events.on_event(DeployEvent::StageStarted {
            stage: Stage::LocalRun,
        });
        if dry_run {
            events.on_event(DeployEvent::Info {
                stage: Stage::LocalRun,
                message: format!("would run: {}", command),
            });
            return Ok(DeployOutcome::Local {
                command,
                exit_code: None,
            });
        }

        let code = self
            .local_runner
            .run(&command, &self.project_root)
            .map_err(|e| DeployError::LocalRun {
                command: command.clone(),
                message: e.to_string(),
            })?;
        Ok(DeployOutcome::Local {
            command,
            exit_code: Some(code),
        })
    }

    fn run_remote(
        &self,
        profile: &EnvironmentProfile,
        options: &DeployOptions,
    ) -> DeployResult<DeployReport> {
        let events = self.events.as_ref();
        let settings = &self.config.deploy;
        let mut warnings = Vec::new();

        events.on_event(DeployEvent::Started {
            environment: profile.environment,
            target: profile.target(),
        });

        // Everything that can fail locally fails before the first connection.
        let layout = self.config.containers.layout(Path::new(CONFIG_FILE))?;
        let containers = ContainerSet::for_profile(profile, &layout);
        let plan = plan_for_profile(&self.project_root, profile, &settings.ignore_file)?;
        events.on_event(DeployEvent::Planned {
            files: plan.files.len(),
            excluded: plan.excluded.len(),
            fingerprint: plan.fingerprint.to_string(),
        });
        warnings.extend(plan.warnings.iter().cloned());

        let shell = session::connect(&self.connector, profile, events)?;

        let mut report = DeployReport {
            environment: profile.environment,
            target: profile.target(),
            dry_run: options.dry_run,
            files_planned: plan.files.len(),
            files_pushed: 0,
            files_removed: 0,
            excluded: plan.excluded.len(),
            fingerprint: plan.fingerprint.clone(),
            backup: None,
            database: None,
            migration: None,
            health: None,
            warnings: Vec::new(),
        };

        if options.dry_run {
            for path in &plan.excluded {
                events.on_event(DeployEvent::Excluded { path: path.clone() });
            }
            events.on_event(DeployEvent::Info {
                stage: Stage::Transfer,
                message: format!("dry run: nothing changed on {}", report.target),
            });
            report.warnings = warnings;
            return Ok(report);
        }

        let _locks = session::lock(self.run_lock.as_ref(), shell.as_ref(), profile, events)?;

        // Backup
        if options.backup.should_run(profile.backup_before_deploy) {
            events.on_event(DeployEvent::StageStarted {
                stage: Stage::Backup,
            });
            let request = BackupRequest {
                profile,
                containers: &containers,
                mode: BackupMode::Full,
                keep: settings.backup_keep,
                log_tail: settings.log_tail,
                dump_image: &self.config.migrations.dump_image,
                local_dir: local_backup_dir(&self.project_root, profile.environment),
                created_at: Utc::now(),
            };
            let outcome = run_backup(shell.as_ref(), &request, events)?;
            match &outcome {
                BackupOutcome::Created { warnings: w, .. } => warnings.extend(w.iter().cloned()),
                BackupOutcome::Skipped { reason } => {
                    let message = format!("backup skipped: {}", reason);
                    events.on_event(DeployEvent::Warning {
                        stage: Stage::Backup,
                        message: message.clone(),
                    });
                    warnings.push(message);
                }
            }
            report.backup = Some(outcome);
        }

        // Transfer
        events.on_event(DeployEvent::StageStarted {
            stage: Stage::Transfer,
        });
        let endpoint = profile.endpoint(settings.connect_timeout());
        let transferred = execute_transfer(
            &plan,
            &TransferTarget {
                project_root: &self.project_root,
                remote_root: &profile.remote_dir,
                endpoint: &endpoint,
                shell: shell.as_ref(),
            },
            &self.transfers,
            events,
        )?;
        report.files_pushed = transferred.pushed.len();
        report.files_removed = transferred.removed.len();
        warnings.extend(transferred.warnings);

        // Build
        events.on_event(DeployEvent::StageStarted {
            stage: Stage::Build,
        });
        let docker = DockerCommands::new(profile.privilege);
        exec_ok(
            shell.as_ref(),
            events,
            &docker.build(&profile.remote_dir, &profile.image_tag),
        )
        .map_err(|reason| DeployError::ImageBuildFailure {
            tag: profile.image_tag.clone(),
            reason,
        })?;
        events.on_event(DeployEvent::ImageBuilt {
            tag: profile.image_tag.clone(),
        });

        // Classify
        events.on_event(DeployEvent::StageStarted {
            stage: Stage::Classify,
        });
        let state = inspect_database(shell.as_ref(), profile, &self.config.migrations, events)?;
        if let DatabaseState::Unreachable { reason } = &state {
            return Err(DeployError::DatabaseUnreachable {
                host: profile.host.clone(),
                reason: reason.clone(),
            });
        }
        report.database = Some(state.clone());

        // Migrate
        events.on_event(DeployEvent::StageStarted {
            stage: Stage::Migrate,
        });
        let action = apply_migrations(
            shell.as_ref(),
            profile,
            &self.config.migrations,
            &state,
            events,
        )?;
        report.migration = Some(action);

        // Containers
        events.on_event(DeployEvent::StageStarted {
            stage: Stage::Containers,
        });
        replace_containers(shell.as_ref(), profile, &containers, events)?;

        // Health
        events.on_event(DeployEvent::StageStarted {
            stage: Stage::Health,
        });
        let health = verify_health(
            shell.as_ref(),
            profile,
            HealthPolicy {
                settle: settings.settle(),
                retries: settings.health_retries,
                interval: settings.health_interval(),
            },
            events,
        );
        if !health.is_healthy() {
            let message = format!(
                "{} did not answer healthy on port {}{}; previous containers were already replaced, check the service manually",
                layout.app_name, profile.app_port, profile.health_path
            );
            events.on_event(DeployEvent::Warning {
                stage: Stage::Health,
                message: message.clone(),
            });
            warnings.push(message);
        }
        report.health = Some(health);

        report.warnings = warnings;
        self.complete(&report);
        Ok(report)
    }

    fn complete(&self, report: &DeployReport) {
        self.events.on_event(DeployEvent::Completed {
            environment: report.environment,
            degraded: report.is_degraded(),
            warnings: report.warnings.len(),
        });
    }
}
