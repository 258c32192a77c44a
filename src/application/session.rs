//! Connection and locking steps shared by deploy and backup.

use chrono::Utc;

use crate::domain::entities::EnvironmentProfile;
use crate::domain::ports::{
    DeployEvent, DeployEventSink, LockError, LockGuard, RemoteConnector, RemoteShell, RunLock,
};
use crate::domain::value_objects::Stage;
use crate::error::{DeployError, DeployResult};

use super::remote::exec;
use super::remote_lock::{self, RemoteLockGuard};

/// Open a shell and prove the host answers.
pub(crate) fn connect(
    connector: &dyn RemoteConnector,
    profile: &EnvironmentProfile,
    events: &dyn DeployEventSink,
) -> DeployResult<Box<dyn RemoteShell>> {
    events.on_event(DeployEvent::StageStarted {
        stage: Stage::Connect,
    });
    let shell = connector.connect(profile);
    let output = exec(shell.as_ref(), events, "true").map_err(|e| DeployError::UnreachableHost {
        host: profile.host.clone(),
        reason: e.to_string(),
    })?;
    if !output.is_success() {
        return Err(DeployError::UnreachableHost {
            host: profile.host.clone(),
            reason: output.failure_reason(),
        });
    }
    events.on_event(DeployEvent::Info {
        stage: Stage::Connect,
        message: format!("connected to {}", shell.target()),
    });
    Ok(shell)
}

/// Both locks of one run; dropping releases them, remote first.
pub(crate) struct RunLocks<'a> {
    _remote: RemoteLockGuard<'a>,
    _local: Box<dyn LockGuard>,
}

/// Take the local lock, then the remote one.
pub(crate) fn lock<'a>(
    run_lock: &dyn RunLock,
    shell: &'a dyn RemoteShell,
    profile: &EnvironmentProfile,
    events: &dyn DeployEventSink,
) -> DeployResult<RunLocks<'a>> {
    events.on_event(DeployEvent::StageStarted { stage: Stage::Lock });
    let local = run_lock
        .acquire(profile.environment)
        .map_err(|e| match e {
            LockError::Held { holder } => DeployError::DeployInProgress {
                environment: profile.environment,
                holder: format!("local: {}", holder),
            },
            LockError::Access(reason) => DeployError::LockFailure { reason },
        })?;
    let remote = remote_lock::acquire(shell, profile, &holder(), events)?;
    Ok(RunLocks {
        _remote: remote,
        _local: local,
    })
}

/// Identity written into lock files.
pub(crate) fn holder() -> String {
    format!(
        "pid {} since {}",
        std::process::id(),
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
}
