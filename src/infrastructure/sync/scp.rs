//! SCP Transfer Strategy
//!
//! Fallback when rsync is not available. scp has no file-list mode and no
//! renaming, so admitted files are first staged into a temporary directory
//! laid out exactly like the remote base directory, then copied with
//! `scp -r`. Only staged paths are sent.

use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::domain::ports::{PlannedFile, PushReport, PushRequest, TransferError, TransferStrategy};

use super::{can_spawn, create_remote_dirs, last_line, parent_dirs};

/// Transfer strategy using scp
pub struct ScpTransfer;

impl ScpTransfer {
    /// Check if scp is installed and available
    pub fn check_available() -> bool {
        // scp without args returns non-zero, but if we can spawn it, it's available
        can_spawn("scp", &[])
    }

    /// Copy `files` into `staging_root` at their destination paths.
    fn stage_files(
        local_root: &Path,
        staging_root: &Path,
        files: &[&PlannedFile],
    ) -> Result<(), TransferError> {
        for file in files {
            let target = staging_root.join(&file.destination);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| TransferError::Io(e.to_string()))?;
            }
            fs::copy(local_root.join(&file.source), &target).map_err(|e| {
                TransferError::Io(format!("staging {}: {}", file.source.display(), e))
            })?;
        }
        Ok(())
    }
}

impl TransferStrategy for ScpTransfer {
    fn name(&self) -> &'static str {
        "scp"
    }

    fn is_available(&self) -> bool {
        Self::check_available()
    }

    fn push(&self, request: &PushRequest<'_>) -> Result<PushReport, TransferError> {
        let (admitted, refused) = request.admitted();
        let report = PushReport {
            pushed: admitted.iter().map(|f| f.destination.clone()).collect(),
            refused,
        };

        // Step 1: Create remote directories (scp doesn't do this automatically)
        let dirs = parent_dirs(admitted.iter().map(|f| f.destination.as_path()));
        create_remote_dirs(request.endpoint, request.remote_root, &dirs)?;

        if admitted.is_empty() {
            return Ok(report);
        }

        // Step 2: Stage admitted files under their remote names
        let staging = tempfile::tempdir().map_err(|e| TransferError::Io(e.to_string()))?;
        Self::stage_files(request.local_root, staging.path(), &admitted)?;

        // Step 3: Copy every top-level staged entry into the remote root
        let mut entries: Vec<_> = fs::read_dir(staging.path())
            .map_err(|e| TransferError::Io(e.to_string()))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .collect();
        entries.sort();

        let output = Command::new("scp")
            .args(request.endpoint.scp_args())
            .arg("-r")
            .arg("-p")
            .args(&entries)
            .arg(request.endpoint.remote_spec(&format!(
                "{}/",
                request.remote_root.trim_end_matches('/')
            )))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| TransferError::CommandFailed(format!("scp: {}", e)))?;

        if !output.status.success() {
            return Err(TransferError::CommandFailed(format!(
                "scp failed with exit code {:?}: {}",
                output.status.code(),
                last_line(&output.stderr)
            )));
        }

        Ok(report)
    }
}
