//! Deploy Use Case Tests

use super::*;
use crate::application::backup::BackupOutcome;
use crate::application::containers::HealthOutcome;
use crate::application::testing::{
    config, project, FakeConnector, FakeRunLock, RecordingRunner, RecordingSink,
    RecordingTransfer, RemoteState, REMOTE_DIR,
};
use crate::config::Config;
use crate::domain::ports::{DeployEvent, TransferStrategy};
use crate::domain::services::MigrationAction;
use crate::domain::value_objects::{DatabaseState, Environment, ProbeReport, Stage};
use crate::error::{DeployError, EXIT_DEGRADED, EXIT_OK};
use std::fs;
use std::path::Path;
use std::sync::Arc;

struct Harness {
    connector: FakeConnector,
    transfer: RecordingTransfer,
    runner: RecordingRunner,
    sink: Arc<RecordingSink>,
}

impl Harness {
    fn new(state: RemoteState) -> Self {
        Self {
            connector: FakeConnector::new(state),
            transfer: RecordingTransfer::default(),
            runner: RecordingRunner::default(),
            sink: Arc::new(RecordingSink::default()),
        }
    }

    fn use_case(
        &self,
        config: Config,
        root: &Path,
        run_lock: FakeRunLock,
    ) -> DeployUseCase<FakeConnector, RecordingRunner> {
        let transfers: Vec<Box<dyn TransferStrategy>> = vec![Box::new(self.transfer.clone())];
        DeployUseCase::new(
            config,
            root,
            self.connector.clone(),
            self.runner.clone(),
            transfers,
            Box::new(run_lock),
        )
        .with_events(self.sink.clone())
    }

    fn deploy(&self, root: &Path, options: DeployOptions) -> Result<DeployOutcome, DeployError> {
        self.use_case(config(), root, FakeRunLock::default())
            .execute(&options)
    }

    fn ran(&self, fragment: &str) -> bool {
        self.connector
            .commands()
            .iter()
            .any(|c| c.contains(fragment))
    }

    fn count(&self, fragment: &str) -> usize {
        self.connector
            .commands()
            .iter()
            .filter(|c| c.contains(fragment))
            .count()
    }
}

fn report(outcome: DeployOutcome) -> DeployReport {
    match outcome {
        DeployOutcome::Remote(report) => report,
        other => panic!("expected remote outcome, got {:?}", other),
    }
}

fn homolog() -> DeployOptions {
    DeployOptions::new(Environment::Homolog)
}

fn pending_state() -> RemoteState {
    let mut state = RemoteState::deployed("0001_initial");
    state.database = Some(ProbeReport {
        connected: true,
        history_table: true,
        current_revision: Some("0001_initial".to_string()),
        head_revision: Some("0002_campaigns".to_string()),
        pending: vec!["0002_campaigns".to_string()],
        error: None,
    });
    state
}

// === Development ===

#[test]
fn development_runs_local_command_without_connecting() {
    let dir = project();
    let harness = Harness {
        runner: RecordingRunner {
            code: 0,
            ..Default::default()
        },
        ..Harness::new(RemoteState::fresh())
    };

    let outcome = harness
        .deploy(dir.path(), DeployOptions::new(Environment::Development))
        .unwrap();

    assert_eq!(outcome.exit_code(), EXIT_OK);
    assert_eq!(harness.connector.connect_count(), 0);
    assert!(harness.connector.commands().is_empty());
    let calls = harness.runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "docker compose up --build");
    assert_eq!(calls[0].1, dir.path());
}

#[test]
fn development_passes_local_exit_status_through() {
    let dir = project();
    let harness = Harness {
        runner: RecordingRunner {
            code: 3,
            ..Default::default()
        },
        ..Harness::new(RemoteState::fresh())
    };

    let outcome = harness
        .deploy(dir.path(), DeployOptions::new(Environment::Development))
        .unwrap();
    assert_eq!(outcome.exit_code(), 3);
}

#[test]
fn development_dry_run_does_not_run_anything() {
    let dir = project();
    let harness = Harness::new(RemoteState::fresh());

    let outcome = harness
        .deploy(
            dir.path(),
            DeployOptions::new(Environment::Development).with_dry_run(true),
        )
        .unwrap();

    assert!(matches!(outcome, DeployOutcome::Local { exit_code: None, .. }));
    assert!(harness.runner.calls().is_empty());
    assert_eq!(harness.connector.connect_count(), 0);
}

// === Full pipeline ===

#[test]
fn first_deploy_initializes_database_and_starts_containers() {
    let dir = project();
    let harness = Harness::new(RemoteState::fresh());

    let report = report(harness.deploy(dir.path(), homolog()).unwrap());

    assert_eq!(report.database, Some(DatabaseState::Uninitialized));
    assert_eq!(report.migration, Some(MigrationAction::Initialize));
    assert_eq!(report.health, Some(HealthOutcome::Healthy { attempts: 1 }));
    assert_eq!(report.exit_code(), EXIT_OK);
    assert!(report.backup.is_none());

    let remote = harness.connector.remote();
    assert!(remote.containers.contains("campaigns-api"));
    assert!(remote.containers.contains("campaigns-redis"));
    assert!(remote.volumes.contains("campaigns_logs"));
    assert!(remote.volumes.contains("campaigns_redis_data"));
    assert!(remote.lock_holder.is_none(), "remote lock released");
}

#[test]
fn pipeline_stages_run_in_order() {
    let dir = project();
    let harness = Harness::new(pending_state());
    harness.deploy(dir.path(), homolog()).unwrap();

    let commands = harness.connector.commands();
    let position = |fragment: &str| {
        commands
            .iter()
            .position(|c| c.contains(fragment))
            .unwrap_or_else(|| panic!("{} never ran", fragment))
    };
    assert!(position("if mkdir") < position("build -t"));
    assert!(position("build -t") < position("check_database.py"));
    assert!(position("check_database.py") < position("alembic upgrade head"));
    assert!(position("alembic upgrade head") < position("docker rm "));
    assert!(position("docker rm ") < position("run -d"));
    assert!(position("run -d") < position("curl"));
}

#[test]
fn pending_migrations_upgrade_without_seeding() {
    let dir = project();
    let harness = Harness::new(pending_state());

    let report = report(harness.deploy(dir.path(), homolog()).unwrap());

    assert!(matches!(
        report.migration,
        Some(MigrationAction::Upgrade { ref to, .. }) if to == "0002_campaigns"
    ));
    assert_eq!(harness.count("alembic upgrade head"), 1);
    assert_eq!(harness.count("seed_data.py"), 0);
}

#[test]
fn push_renames_env_file_and_skips_optional_repo() {
    let dir = project();
    let harness = Harness::new(RemoteState::deployed("0001_initial"));

    let report = report(harness.deploy(dir.path(), homolog()).unwrap());

    let pushed = harness.transfer.pushed();
    assert!(pushed
        .iter()
        .any(|f| f.source == Path::new(".env.homolog") && f.destination == Path::new(".env")));
    assert!(pushed.iter().all(|f| f.source != Path::new(".env.production")));
    assert_eq!(report.files_pushed, report.files_planned);
    assert!(harness.sink.events().iter().any(|e| matches!(
        e,
        DeployEvent::ArtifactSkipped { artifact, .. } if artifact == Path::new("repo")
    )));
}

// === Scenario B / P1: static/ never leaves the machine ===

#[test]
fn local_static_never_pushed_and_remote_static_untouched() {
    let dir = project();
    let mut state = RemoteState::deployed("0001_initial");
    let remote_upload = format!("{}/static/uploads/bar.jpg", REMOTE_DIR);
    state.paths.insert(remote_upload.clone());
    let harness = Harness::new(state);

    let report = report(harness.deploy(dir.path(), homolog()).unwrap());

    assert!(harness
        .transfer
        .pushed()
        .iter()
        .all(|f| !f.source.starts_with("static") && !f.destination.starts_with("static")));
    assert!(harness.connector.remote().paths.contains(&remote_upload));
    assert!(harness
        .connector
        .commands()
        .iter()
        .filter(|c| c.contains("static"))
        .all(|c| !c.contains("rm ") && !c.contains("cp ")));
    assert!(report.health.is_some());
}

#[test]
fn static_nested_in_artifacts_is_reported_excluded() {
    let dir = project();
    fs::create_dir_all(dir.path().join("app/static")).unwrap();
    fs::write(dir.path().join("app/static/logo.png"), "png").unwrap();
    let harness = Harness::new(RemoteState::deployed("0001_initial"));

    harness.deploy(dir.path(), homolog()).unwrap();

    assert!(harness
        .transfer
        .pushed()
        .iter()
        .all(|f| !f.source.starts_with("app/static")));
    assert!(harness.sink.events().iter().any(|e| matches!(
        e,
        DeployEvent::Excluded { path } if path == Path::new("app/static")
    )));
}

#[test]
fn deployignore_patterns_are_never_pushed() {
    let dir = project();
    fs::write(dir.path().join(".deployignore"), "*.pyc\n").unwrap();
    fs::write(dir.path().join("app/x.pyc"), "bytecode").unwrap();
    let harness = Harness::new(RemoteState::deployed("0001_initial"));

    harness.deploy(dir.path(), homolog()).unwrap();

    let pushed = harness.transfer.pushed();
    assert!(pushed.iter().any(|f| f.source == Path::new("app/main.py")));
    assert!(pushed.iter().all(|f| f.source != Path::new("app/x.pyc")));
    assert!(harness.sink.events().iter().any(|e| matches!(
        e,
        DeployEvent::Excluded { path } if path == Path::new("app/x.pyc")
    )));
}

// === Mirrored directories ===

#[test]
fn mirrored_directories_drop_stale_remote_files() {
    let dir = project();
    let mut state = RemoteState::deployed("0001_initial");
    let stale = format!("{}/migrations/versions/old.py", REMOTE_DIR);
    let current = format!("{}/migrations/versions/0001_initial.py", REMOTE_DIR);
    let upload = format!("{}/static/uploads/bar.jpg", REMOTE_DIR);
    let nested_static = format!("{}/app/static/logo.png", REMOTE_DIR);
    for path in [&stale, &current, &upload, &nested_static] {
        state.paths.insert(path.clone());
    }
    let harness = Harness::new(state);

    let report = report(harness.deploy(dir.path(), homolog()).unwrap());

    let remote = harness.connector.remote();
    assert!(!remote.paths.contains(&stale));
    assert!(remote.paths.contains(&current));
    assert!(remote.paths.contains(&upload));
    assert!(remote.paths.contains(&nested_static));
    drop(remote);

    assert_eq!(report.files_removed, 1);
    assert!(harness.sink.events().iter().any(|e| matches!(
        e,
        DeployEvent::StaleRemoved { artifact, files: 1 } if artifact == Path::new("migrations")
    )));
}

#[test]
fn prune_listing_failure_on_required_directory_aborts() {
    let dir = project();
    let mut state = RemoteState::deployed("0001_initial");
    state.fail_on.push("find 'app'".to_string());
    let harness = Harness::new(state);

    let err = harness.deploy(dir.path(), homolog()).unwrap_err();

    assert!(matches!(
        err,
        DeployError::RequiredTransferFailure { ref artifact, ref reason }
            if artifact == Path::new("app") && reason.starts_with("removing stale files")
    ));
    assert!(!harness.ran("build -t"));
}

// === Per-artifact push ===

#[test]
fn optional_artifact_failure_is_a_warning() {
    let dir = project();
    fs::create_dir_all(dir.path().join("repo")).unwrap();
    fs::write(dir.path().join("repo/notes.md"), "notes").unwrap();
    let harness = Harness {
        transfer: RecordingTransfer {
            fail_under: Some("repo".into()),
            ..Default::default()
        },
        ..Harness::new(RemoteState::deployed("0001_initial"))
    };

    let report = report(harness.deploy(dir.path(), homolog()).unwrap());

    assert!(report
        .warnings
        .iter()
        .any(|w| w.starts_with("optional 'repo' not pushed")));
    assert!(harness
        .transfer
        .pushed()
        .iter()
        .all(|f| !f.source.starts_with("repo")));
    assert!(harness.ran("run -d"));
    assert!(report.health.is_some());
}

#[test]
fn required_artifact_failure_names_that_artifact() {
    let dir = project();
    let harness = Harness {
        transfer: RecordingTransfer {
            fail_under: Some("migrations".into()),
            ..Default::default()
        },
        ..Harness::new(RemoteState::deployed("0001_initial"))
    };

    let err = harness.deploy(dir.path(), homolog()).unwrap_err();

    assert!(matches!(
        err,
        DeployError::RequiredTransferFailure { ref artifact, .. } if artifact == Path::new("migrations")
    ));
    assert!(harness
        .transfer
        .pushed()
        .iter()
        .any(|f| f.source == Path::new("app/main.py")));
    assert!(!harness.ran("build -t"));
}

// === Scenario C / P2: migration idempotence ===

#[test]
fn uninitialized_database_seeds_once_and_second_run_is_noop() {
    let dir = project();
    let harness = Harness::new(RemoteState::fresh());

    let first = report(harness.deploy(dir.path(), homolog()).unwrap());
    assert_eq!(first.migration, Some(MigrationAction::Initialize));
    assert_eq!(harness.count("alembic upgrade head"), 1);
    assert_eq!(harness.count("seed_data.py"), 1);

    let second = report(harness.deploy(dir.path(), homolog()).unwrap());
    assert!(matches!(
        second.database,
        Some(DatabaseState::Current { ref revision }) if revision.as_deref() == Some("0002_campaigns")
    ));
    assert!(matches!(second.migration, Some(MigrationAction::Noop { .. })));
    assert_eq!(harness.count("alembic upgrade head"), 1);
    assert_eq!(harness.count("seed_data.py"), 1);
}

#[test]
fn current_database_is_noop_on_repeated_runs() {
    let dir = project();
    let harness = Harness::new(RemoteState::deployed("0002_campaigns"));

    let first = report(harness.deploy(dir.path(), homolog()).unwrap());
    let second = report(harness.deploy(dir.path(), homolog()).unwrap());

    assert_eq!(first.database, second.database);
    assert_eq!(first.migration, second.migration);
    assert!(!harness.ran("alembic upgrade head"));
    assert!(!harness.ran("seed_data.py"));
}

// === P4: fatal stages abort before containers are touched ===

#[test]
fn transfer_failure_leaves_containers_untouched() {
    let dir = project();
    let harness = Harness {
        transfer: RecordingTransfer {
            fail: true,
            ..Default::default()
        },
        ..Harness::new(RemoteState::deployed("0001_initial"))
    };

    let err = harness.deploy(dir.path(), homolog()).unwrap_err();

    assert!(matches!(err, DeployError::RequiredTransferFailure { .. }));
    assert!(!harness.ran("docker stop"));
    assert!(!harness.ran("docker rm "));
    assert!(!harness.ran("build -t"));
    assert!(harness.connector.remote().containers.contains("campaigns-api"));
    assert!(harness.connector.remote().lock_holder.is_none());
}

#[test]
fn missing_required_artifact_fails_before_connecting() {
    let dir = project();
    fs::remove_file(dir.path().join("Dockerfile")).unwrap();
    let harness = Harness::new(RemoteState::deployed("0001_initial"));

    let err = harness.deploy(dir.path(), homolog()).unwrap_err();

    assert!(matches!(err, DeployError::RequiredTransferFailure { .. }));
    assert_eq!(harness.connector.connect_count(), 0);
}

#[test]
fn migration_failure_leaves_containers_untouched() {
    let dir = project();
    let mut state = pending_state();
    state.fail_on.push("alembic upgrade head".to_string());
    let harness = Harness::new(state);

    let err = harness.deploy(dir.path(), homolog()).unwrap_err();

    assert!(matches!(err, DeployError::MigrationFailure { ref step, .. } if step == "upgrade"));
    assert!(!harness.ran("docker stop"));
    assert!(!harness.ran("docker rm "));
    assert!(!harness.ran("run -d"));
    assert_eq!(harness.connector.remote().containers.len(), 2);
}

#[test]
fn image_build_failure_stops_before_migrations() {
    let dir = project();
    let mut state = RemoteState::deployed("0001_initial");
    state.fail_on.push("build -t".to_string());
    let harness = Harness::new(state);

    let err = harness.deploy(dir.path(), homolog()).unwrap_err();

    assert!(matches!(err, DeployError::ImageBuildFailure { ref tag, .. } if tag == "campaigns-api:homolog"));
    assert!(!harness.ran("check_database.py"));
}

#[test]
fn unreachable_database_aborts_before_containers() {
    let dir = project();
    let mut state = RemoteState::deployed("0001_initial");
    state.database = Some(ProbeReport {
        connected: false,
        error: Some("could not translate host name \"db\"".to_string()),
        ..Default::default()
    });
    let harness = Harness::new(state);

    let err = harness.deploy(dir.path(), homolog()).unwrap_err();

    assert!(matches!(
        err,
        DeployError::DatabaseUnreachable { ref reason, .. } if reason.contains("could not translate")
    ));
    assert!(!harness.ran("docker rm "));
}

#[test]
fn missing_check_script_is_its_own_failure() {
    let dir = project();
    let mut state = RemoteState::deployed("0001_initial");
    state.database = None;
    let harness = Harness::new(state);

    let err = harness.deploy(dir.path(), homolog()).unwrap_err();

    assert!(matches!(
        err,
        DeployError::ProbeFailure { ref reason, .. } if reason.contains("can't open file")
    ));
    assert_eq!(err.stage(), Stage::Classify);
    assert!(!harness.ran("alembic upgrade head"));
    assert!(!harness.ran("docker rm "));
}

#[test]
fn status_marker_output_drives_migrations() {
    let dir = project();
    let mut state = pending_state();
    state.status_markers = true;
    let harness = Harness::new(state);

    let report = report(harness.deploy(dir.path(), homolog()).unwrap());

    assert!(matches!(
        report.database,
        Some(DatabaseState::PendingMigrations { ref head, .. }) if head == "0002_campaigns"
    ));
    assert!(matches!(report.migration, Some(MigrationAction::Upgrade { .. })));
    assert_eq!(harness.count("alembic upgrade head"), 1);
    assert_eq!(harness.count("seed_data.py"), 0);
}

#[test]
fn unreachable_host_fails_at_connect() {
    let dir = project();
    let mut state = RemoteState::deployed("0001_initial");
    state.unreachable = true;
    let harness = Harness::new(state);

    let err = harness.deploy(dir.path(), homolog()).unwrap_err();

    assert!(matches!(err, DeployError::UnreachableHost { ref host, .. } if host == "10.0.0.5"));
    assert!(harness.transfer.pushed().is_empty());
}

#[test]
fn lost_connection_during_stop_fails_containers_stage() {
    let dir = project();
    let mut state = RemoteState::deployed("0001_initial");
    state.drop_on.push("docker stop".to_string());
    let harness = Harness::new(state);

    let err = harness.deploy(dir.path(), homolog()).unwrap_err();

    assert!(matches!(
        err,
        DeployError::ContainerFailure { ref operation, .. } if operation.starts_with("stop ")
    ));
    assert!(!harness.ran("docker rm "));
    assert!(!harness.ran("run -d"));
    assert_eq!(harness.connector.remote().containers.len(), 2);
}

// === Scenario E: degraded health ===

#[test]
fn unhealthy_service_completes_degraded_after_bounded_retries() {
    let dir = project();
    let mut state = RemoteState::deployed("0002_campaigns");
    state.default_health = "503".to_string();
    let harness = Harness::new(state);

    let outcome = harness.deploy(dir.path(), homolog()).unwrap();
    assert_eq!(outcome.exit_code(), EXIT_DEGRADED);

    let report = report(outcome);
    assert_eq!(
        report.health,
        Some(HealthOutcome::Unhealthy {
            attempts: 3,
            last_status: Some(503)
        })
    );
    assert!(report.is_degraded());
    assert!(report.warnings.iter().any(|w| w.contains("already replaced")));
    assert_eq!(harness.count("curl"), 3);
    assert!(harness.connector.remote().containers.contains("campaigns-api"));

    let events = harness.sink.events();
    assert!(events.iter().any(|e| matches!(
        e,
        DeployEvent::Completed { degraded: true, .. }
    )));
}

#[test]
fn health_recovers_within_retries() {
    let dir = project();
    let mut state = RemoteState::deployed("0002_campaigns");
    state.health.push_back("000".to_string());
    state.health.push_back("502".to_string());
    let harness = Harness::new(state);

    let report = report(harness.deploy(dir.path(), homolog()).unwrap());
    assert_eq!(report.health, Some(HealthOutcome::Healthy { attempts: 3 }));
    assert_eq!(report.exit_code(), EXIT_OK);
}

// === Backup gating ===

#[test]
fn production_backs_up_before_transfer() {
    let dir = project();
    let harness = Harness::new(RemoteState::deployed("0002_campaigns"));

    let report = report(
        harness
            .deploy(dir.path(), DeployOptions::new(Environment::Production))
            .unwrap(),
    );

    assert!(matches!(report.backup, Some(BackupOutcome::Created { .. })));
    let commands = harness.connector.commands();
    let dump = commands.iter().position(|c| c.contains("pg_dump")).unwrap();
    let build = commands.iter().position(|c| c.contains("build -t")).unwrap();
    assert!(dump < build);
}

#[test]
fn no_backup_flag_skips_production_backup() {
    let dir = project();
    let harness = Harness::new(RemoteState::deployed("0002_campaigns"));

    let report = report(
        harness
            .deploy(
                dir.path(),
                DeployOptions::new(Environment::Production).with_backup(BackupChoice::Skip),
            )
            .unwrap(),
    );

    assert!(report.backup.is_none());
    assert!(!harness.ran("pg_dump"));
}

#[test]
fn backup_failure_aborts_production_deploy() {
    let dir = project();
    let mut state = RemoteState::deployed("0002_campaigns");
    state.fail_on.push("pg_dump".to_string());
    let harness = Harness::new(state);

    let err = harness
        .deploy(dir.path(), DeployOptions::new(Environment::Production))
        .unwrap_err();

    assert!(matches!(err, DeployError::BackupFailure { ref step, .. } if step == "database"));
    assert!(harness.transfer.pushed().is_empty());
}

#[test]
fn forced_backup_on_fresh_host_is_skipped_with_warning() {
    let dir = project();
    let harness = Harness::new(RemoteState::fresh());

    let report = report(
        harness
            .deploy(dir.path(), homolog().with_backup(BackupChoice::Force))
            .unwrap(),
    );

    assert!(matches!(report.backup, Some(BackupOutcome::Skipped { .. })));
    assert!(report.warnings.iter().any(|w| w.starts_with("backup skipped")));
}

// === Dry run ===

#[test]
fn dry_run_connects_but_mutates_nothing() {
    let dir = project();
    let harness = Harness::new(RemoteState::deployed("0001_initial"));

    let report = report(
        harness
            .deploy(dir.path(), homolog().with_dry_run(true))
            .unwrap(),
    );

    assert!(report.dry_run);
    assert!(report.files_planned > 0);
    assert_eq!(report.files_pushed, 0);
    assert!(harness.transfer.pushed().is_empty());
    assert_eq!(harness.connector.commands(), vec!["true".to_string()]);
    assert!(!harness
        .sink
        .events()
        .iter()
        .any(|e| matches!(e, DeployEvent::Completed { .. })));
}

// === Locking ===

#[test]
fn local_lock_held_refuses_to_start() {
    let dir = project();
    let harness = Harness::new(RemoteState::deployed("0001_initial"));
    let use_case = harness.use_case(
        config(),
        dir.path(),
        FakeRunLock {
            held_by: Some("pid 4242".to_string()),
        },
    );

    let err = use_case.execute(&homolog()).unwrap_err();

    assert!(matches!(
        err,
        DeployError::DeployInProgress { ref holder, .. } if holder == "local: pid 4242"
    ));
    assert!(harness.transfer.pushed().is_empty());
}

#[test]
fn remote_lock_held_refuses_to_start() {
    let dir = project();
    let mut state = RemoteState::deployed("0001_initial");
    state.lock_holder = Some("pid 77 since 2026-10-14 09:00:00 UTC".to_string());
    let harness = Harness::new(state);

    let err = harness.deploy(dir.path(), homolog()).unwrap_err();

    assert!(matches!(
        err,
        DeployError::DeployInProgress { ref holder, .. } if holder.starts_with("remote: pid 77")
    ));
    assert!(!harness.ran("build -t"));
    assert!(harness.connector.remote().lock_holder.is_some(), "foreign lock kept");
}

// === Resolution failures ===

#[test]
fn missing_ssh_key_fails_before_any_transfer() {
    let dir = project();
    fs::remove_file(dir.path().join("keys/id_ed25519")).unwrap();
    let harness = Harness::new(RemoteState::deployed("0001_initial"));

    let err = harness
        .deploy(dir.path(), DeployOptions::new(Environment::Production))
        .unwrap_err();

    assert!(matches!(err, DeployError::MissingCredential { .. }));
    assert_eq!(harness.connector.connect_count(), 0);
    assert!(harness.transfer.pushed().is_empty());
}

#[test]
fn incomplete_configuration_fails_before_connecting() {
    let dir = project();
    let harness = Harness::new(RemoteState::fresh());
    let mut cfg = config();
    cfg.environment_mut(Environment::Homolog).host = None;

    let err = harness
        .use_case(cfg, dir.path(), FakeRunLock::default())
        .execute(&homolog())
        .unwrap_err();

    assert!(matches!(
        err,
        DeployError::IncompleteConfiguration { ref missing, .. } if missing == &vec!["host".to_string()]
    ));
    assert_eq!(harness.connector.connect_count(), 0);
}

#[test]
fn no_transfer_tool_is_required_failure() {
    let dir = project();
    let harness = Harness {
        transfer: RecordingTransfer {
            unavailable: true,
            ..Default::default()
        },
        ..Harness::new(RemoteState::deployed("0001_initial"))
    };

    let err = harness.deploy(dir.path(), homolog()).unwrap_err();
    assert!(matches!(
        err,
        DeployError::RequiredTransferFailure { ref reason, .. } if reason.contains("neither rsync nor scp")
    ));
}
