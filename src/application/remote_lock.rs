//! Remote run lock
//!
//! `mkdir` is atomic on the remote filesystem: the run that creates
//! `<remote_dir>/.deploy-lock` owns the environment until it removes it.
//! A run killed mid-pipeline leaves the directory behind; the holder file
//! names who to ask before removing it by hand.

use crate::domain::entities::EnvironmentProfile;
use crate::domain::ports::{DeployEventSink, RemoteShell};
use crate::domain::services::shell::quote;
use crate::error::{DeployError, DeployResult};

use super::remote::exec;

pub const REMOTE_LOCK_DIR: &str = ".deploy-lock";

/// Exit status of the lock command when the directory already exists
const HELD_EXIT_CODE: i32 = 73;

/// Held remote lock; released on drop.
pub struct RemoteLockGuard<'a> {
    shell: &'a dyn RemoteShell,
    dir: String,
}

impl std::fmt::Debug for RemoteLockGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteLockGuard").field("dir", &self.dir).finish()
    }
}

pub fn acquire<'a>(
    shell: &'a dyn RemoteShell,
    profile: &EnvironmentProfile,
    holder: &str,
    events: &dyn DeployEventSink,
) -> DeployResult<RemoteLockGuard<'a>> {
    let dir = profile.remote_path(REMOTE_LOCK_DIR);
    let command = format!(
        "mkdir -p {base} && if mkdir {dir} 2>/dev/null; then printf '%s\\n' {holder} > {dir}/holder; else exit {held}; fi",
        base = quote(&profile.remote_dir),
        dir = quote(&dir),
        holder = quote(holder),
        held = HELD_EXIT_CODE,
    );

    let output = exec(shell, events, &command).map_err(|e| DeployError::UnreachableHost {
        host: profile.host.clone(),
        reason: e.to_string(),
    })?;

    if output.is_success() {
        return Ok(RemoteLockGuard { shell, dir });
    }
    if output.code != Some(HELD_EXIT_CODE) {
        return Err(DeployError::LockFailure {
            reason: output.failure_reason(),
        });
    }

    let holder = shell
        .run(&format!("cat {}/holder 2>/dev/null", quote(&dir)))
        .ok()
        .map(|out| out.stdout.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("lock directory {} exists", dir));

    Err(DeployError::DeployInProgress {
        environment: profile.environment,
        holder: format!("remote: {}", holder),
    })
}

impl Drop for RemoteLockGuard<'_> {
    fn drop(&mut self) {
        let _ = self.shell.run(&format!("rm -rf {}", quote(&self.dir)));
    }
}
