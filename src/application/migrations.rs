//! Database inspection and migration dispatch
//!
//! Both run inside throwaway containers of the freshly built image so the
//! probe and the migration chain always match the code being deployed.

use crate::config::MigrationsConfig;
use crate::domain::entities::{EnvironmentProfile, REMOTE_ENV_FILE};
use crate::domain::ports::{DeployEvent, DeployEventSink, RemoteShell};
use crate::domain::services::{classify, DockerCommands, MigrationAction, MigrationStep};
use crate::domain::value_objects::{DatabaseState, ProbeOutcome, ProbeReport, Stage};
use crate::error::{DeployError, DeployResult};

use super::remote::exec;

/// Run the probe and classify the database.
///
/// Fails with `ProbeFailure` when the probe ran but printed neither a JSON
/// report nor status markers (missing script, crash, bad environment file).
pub fn inspect_database(
    shell: &dyn RemoteShell,
    profile: &EnvironmentProfile,
    commands: &MigrationsConfig,
    events: &dyn DeployEventSink,
) -> DeployResult<DatabaseState> {
    let outcome = run_probe(shell, profile, commands, events)?;
    let state = classify(&outcome);
    events.on_event(DeployEvent::DatabaseClassified {
        state: state.clone(),
    });
    Ok(state)
}

fn run_probe(
    shell: &dyn RemoteShell,
    profile: &EnvironmentProfile,
    commands: &MigrationsConfig,
    events: &dyn DeployEventSink,
) -> DeployResult<ProbeOutcome> {
    let docker = DockerCommands::new(profile.privilege);
    let command = docker.run_once(
        &profile.image_tag,
        &profile.remote_path(REMOTE_ENV_FILE),
        &commands.probe_command,
    );

    let output = match exec(shell, events, &command) {
        Ok(output) => output,
        Err(e) => {
            return Ok(ProbeOutcome::Failed {
                reason: e.to_string(),
            })
        }
    };

    // The probe exits non-zero when it cannot connect but still prints its
    // report, so the report takes precedence over the exit status.
    if let Some(report) = ProbeReport::parse(&output.stdout) {
        return Ok(ProbeOutcome::Report(report));
    }
    let reason = if output.is_success() {
        "output held no JSON report or status marker".to_string()
    } else {
        output.failure_reason()
    };
    Err(DeployError::ProbeFailure {
        command: commands.probe_command.clone(),
        reason,
    })
}

/// Select and apply the migration action for `state`.
///
/// Returns the applied action. Fails with `DatabaseUnreachable` for an
/// unreachable database and `MigrationFailure` when a step exits non-zero;
/// nothing is rolled back.
pub fn apply_migrations(
    shell: &dyn RemoteShell,
    profile: &EnvironmentProfile,
    commands: &MigrationsConfig,
    state: &DatabaseState,
    events: &dyn DeployEventSink,
) -> DeployResult<MigrationAction> {
    let Some(action) = MigrationAction::for_state(state) else {
        let reason = match state {
            DatabaseState::Unreachable { reason } => reason.clone(),
            other => other.to_string(),
        };
        return Err(DeployError::DatabaseUnreachable {
            host: profile.host.clone(),
            reason,
        });
    };

    match &action {
        MigrationAction::Noop { revision } => {
            events.on_event(DeployEvent::MigrationsSkipped {
                revision: revision.clone(),
            });
            return Ok(action);
        }
        MigrationAction::Initialize => events.on_event(DeployEvent::Info {
            stage: Stage::Migrate,
            message: "first installation: applying full migration chain and seed data"
                .to_string(),
        }),
        MigrationAction::Upgrade { from, to, pending } => events.on_event(DeployEvent::Info {
            stage: Stage::Migrate,
            message: format!(
                "upgrading {} -> {} ({} pending: {})",
                from.as_deref().unwrap_or("<empty>"),
                to,
                pending.len(),
                pending.join(", ")
            ),
        }),
    }

    let docker = DockerCommands::new(profile.privilege);
    let env_file = profile.remote_path(REMOTE_ENV_FILE);
    for step in action.steps() {
        let body = match step {
            MigrationStep::Upgrade => &commands.upgrade_command,
            MigrationStep::Seed => &commands.seed_command,
        };
        events.on_event(DeployEvent::MigrationStep {
            step: step.as_str(),
        });
        let command = docker.run_once(&profile.image_tag, &env_file, body);
        let output = exec(shell, events, &command).map_err(|e| DeployError::MigrationFailure {
            step: step.as_str().to_string(),
            reason: e.to_string(),
        })?;
        if !output.is_success() {
            return Err(DeployError::MigrationFailure {
                step: step.as_str().to_string(),
                reason: output.failure_reason(),
            });
        }
    }

    Ok(action)
}
