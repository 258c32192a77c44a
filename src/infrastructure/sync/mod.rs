//! Transfer Strategy Implementations
//!
//! Concrete implementations of the `TransferStrategy` port:
//! - `RsyncTransfer`: incremental transfer of the planned file list (preferred)
//! - `ScpTransfer`: staged full copy (fallback when rsync is not installed)
//!
//! Both push only what `PushRequest::admitted` lets through and neither
//! deletes anything on the remote side. Stale files under mirrored
//! directories are removed afterwards by the transfer stage, which never
//! touches excluded paths such as `static/`.

mod rsync;
mod scp;

pub use rsync::RsyncTransfer;
pub use scp::ScpTransfer;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::domain::ports::{TransferError, TransferStrategy};
use crate::domain::services::shell::quote;
use crate::domain::value_objects::SshEndpoint;

/// Strategies in order of preference.
pub fn default_strategies() -> Vec<Box<dyn TransferStrategy>> {
    vec![Box::new(RsyncTransfer), Box::new(ScpTransfer)]
}

/// Detect and return the best available transfer strategy
pub fn detect_strategy() -> Option<Box<dyn TransferStrategy>> {
    default_strategies().into_iter().find(|s| s.is_available())
}

/// Remote join of `remote_root` and a relative path.
pub(crate) fn remote_join(remote_root: &str, rel: &Path) -> String {
    let base = remote_root.trim_end_matches('/');
    let rel = rel.to_string_lossy();
    if rel.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, rel)
    }
}

/// Parent directories of `destinations`, relative to the remote root.
pub(crate) fn parent_dirs<'a>(destinations: impl IntoIterator<Item = &'a Path>) -> BTreeSet<PathBuf> {
    destinations
        .into_iter()
        .filter_map(|p| p.parent())
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .collect()
}

/// Create the remote root and `dirs` below it with one ssh call.
pub(crate) fn create_remote_dirs(
    endpoint: &SshEndpoint,
    remote_root: &str,
    dirs: &BTreeSet<PathBuf>,
) -> Result<(), TransferError> {
    let mut paths = vec![quote(remote_root)];
    paths.extend(dirs.iter().map(|d| quote(&remote_join(remote_root, d))));

    let output = Command::new("ssh")
        .args(endpoint.ssh_args())
        .arg(endpoint.destination())
        .arg("--")
        .arg(format!("mkdir -p {}", paths.join(" ")))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| TransferError::CommandFailed(format!("ssh: {}", e)))?;

    if !output.status.success() {
        return Err(TransferError::CommandFailed(format!(
            "failed to create remote directories: {}",
            last_line(&output.stderr)
        )));
    }
    Ok(())
}

/// Last non-empty line of a tool's stderr.
pub(crate) fn last_line(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("no output")
        .to_string()
}

/// Whether `program` can be spawned at all.
pub(crate) fn can_spawn(program: &str, args: &[&str]) -> bool {
    Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}
