//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::path::Path;
use std::sync::Arc;

use crate::application::{BackupUseCase, DeployUseCase};
use crate::config::Config;
use crate::domain::ports::DeployEventSink;
use crate::infrastructure::{default_strategies, FileRunLock, ProcessRunner, SshConnector};

/// Type alias for the concrete DeployUseCase with all dependencies
pub type ConcreteDeployUseCase = DeployUseCase<SshConnector, ProcessRunner>;

/// Type alias for the concrete BackupUseCase with all dependencies
pub type ConcreteBackupUseCase = BackupUseCase<SshConnector>;

/// Create a deploy use case with all dependencies wired up
///
/// Transfers prefer rsync and fall back to scp; the run lock lives under the
/// project's `.deploy/locks`.
pub fn create_deploy_use_case(
    config: Config,
    project_root: &Path,
    events: Arc<dyn DeployEventSink>,
) -> ConcreteDeployUseCase {
    let connector = SshConnector::new(config.deploy.connect_timeout());
    let run_lock = Box::new(FileRunLock::new(project_root));

    DeployUseCase::new(
        config,
        project_root,
        connector,
        ProcessRunner,
        default_strategies(),
        run_lock,
    )
    .with_events(events)
}

/// Create a backup use case with all dependencies wired up
pub fn create_backup_use_case(
    config: Config,
    project_root: &Path,
    events: Arc<dyn DeployEventSink>,
) -> ConcreteBackupUseCase {
    let connector = SshConnector::new(config.deploy.connect_timeout());
    let run_lock = Box::new(FileRunLock::new(project_root));

    BackupUseCase::new(config, project_root, connector, run_lock).with_events(events)
}
