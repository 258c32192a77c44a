//! Rsync Transfer Strategy
//!
//! Uses rsync for efficient incremental file transfers.
//! This is the preferred method on Unix systems.
//!
//! Files keeping their path are sent in one `--files-from` batch from the
//! project root; renamed files (the env file) are sent one by one. `--delete`
//! is never passed; stale files are pruned by the transfer stage.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::domain::ports::{PlannedFile, PushReport, PushRequest, TransferError, TransferStrategy};

use super::{create_remote_dirs, last_line, parent_dirs, remote_join};

/// Transfer strategy using rsync
pub struct RsyncTransfer;

impl RsyncTransfer {
    /// Check if rsync is installed and available
    pub fn check_available() -> bool {
        Command::new("rsync")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn base_command(request: &PushRequest<'_>) -> Command {
        let mut cmd = Command::new("rsync");
        cmd.arg("-az")
            .arg("-e")
            .arg(request.endpoint.rsync_shell())
            .current_dir(request.local_root)
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }

    /// NUL-separated file list for `--files-from=- --from0`.
    fn file_list(files: &[&PlannedFile]) -> Vec<u8> {
        let mut list = Vec::new();
        for file in files {
            list.extend_from_slice(file.source.to_string_lossy().as_bytes());
            list.push(0);
        }
        list
    }

    fn push_batch(request: &PushRequest<'_>, files: &[&PlannedFile]) -> Result<(), TransferError> {
        let mut child = Self::base_command(request)
            .arg("--files-from=-")
            .arg("--from0")
            .arg("./")
            .arg(request.endpoint.remote_spec(&format!(
                "{}/",
                request.remote_root.trim_end_matches('/')
            )))
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| TransferError::CommandFailed(format!("rsync: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&Self::file_list(files))
                .map_err(|e| TransferError::Io(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| TransferError::CommandFailed(format!("rsync: {}", e)))?;
        if !output.status.success() {
            return Err(TransferError::CommandFailed(format!(
                "rsync failed with exit code {:?}: {}",
                output.status.code(),
                last_line(&output.stderr)
            )));
        }
        Ok(())
    }

    fn push_renamed(request: &PushRequest<'_>, file: &PlannedFile) -> Result<(), TransferError> {
        let output = Self::base_command(request)
            .arg(&file.source)
            .arg(
                request
                    .endpoint
                    .remote_spec(&remote_join(request.remote_root, &file.destination)),
            )
            .stdin(Stdio::null())
            .output()
            .map_err(|e| TransferError::CommandFailed(format!("rsync: {}", e)))?;
        if !output.status.success() {
            return Err(TransferError::CommandFailed(format!(
                "rsync of {} failed: {}",
                file.source.display(),
                last_line(&output.stderr)
            )));
        }
        Ok(())
    }
}

impl TransferStrategy for RsyncTransfer {
    fn name(&self) -> &'static str {
        "rsync"
    }

    fn is_available(&self) -> bool {
        Self::check_available()
    }

    fn push(&self, request: &PushRequest<'_>) -> Result<PushReport, TransferError> {
        let (admitted, refused) = request.admitted();
        let (renamed, batch): (Vec<&PlannedFile>, Vec<&PlannedFile>) =
            admitted.iter().copied().partition(|f| f.is_renamed());

        let renamed_dirs = parent_dirs(renamed.iter().map(|f| f.destination.as_path()));
        create_remote_dirs(request.endpoint, request.remote_root, &renamed_dirs)?;

        if !batch.is_empty() {
            Self::push_batch(request, &batch)?;
        }
        for file in &renamed {
            Self::push_renamed(request, file)?;
        }

        Ok(PushReport {
            pushed: admitted.iter().map(|f| f.destination.clone()).collect(),
            refused,
        })
    }
}
