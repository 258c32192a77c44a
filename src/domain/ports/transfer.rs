//! Transfer Strategy Port
//!
//! One capability: push a set of planned files to the remote base directory
//! honoring the exclusion list. Implementations differ only in the tool
//! they drive (rsync preferred, scp fallback); the exclusion gate is
//! `PushRequest::admitted`, shared by all of them.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::value_objects::{ExclusionList, SshEndpoint};

/// One file to push
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlannedFile {
    /// Relative to the project root
    pub source: PathBuf,
    /// Relative to the remote base directory
    pub destination: PathBuf,
}

impl PlannedFile {
    pub fn same_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            destination: path.clone(),
            source: path,
        }
    }

    pub fn is_renamed(&self) -> bool {
        self.source != self.destination
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PushRequest<'a> {
    pub local_root: &'a Path,
    pub remote_root: &'a str,
    pub endpoint: &'a SshEndpoint,
    pub files: &'a [PlannedFile],
    pub exclusions: &'a ExclusionList,
}

impl PushRequest<'_> {
    /// Split the request into files allowed to leave the machine and files
    /// refused because their source or destination is excluded.
    pub fn admitted(&self) -> (Vec<&PlannedFile>, Vec<PathBuf>) {
        let mut admitted = Vec::new();
        let mut refused = Vec::new();
        for file in self.files {
            if self.exclusions.is_excluded(&file.source, false)
                || self.exclusions.is_excluded(&file.destination, false)
            {
                refused.push(file.source.clone());
            } else {
                admitted.push(file);
            }
        }
        (admitted, refused)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushReport {
    /// Destinations written
    pub pushed: Vec<PathBuf>,
    /// Sources refused by the exclusion gate
    pub refused: Vec<PathBuf>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransferError {
    #[error("not available: {0}")]
    NotAvailable(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
    #[error("I/O error: {0}")]
    Io(String),
}

pub trait TransferStrategy: Send + Sync {
    /// Name of the transfer method (for logging)
    fn name(&self) -> &'static str;

    /// Check if this transfer method is available on the system
    fn is_available(&self) -> bool;

    fn push(&self, request: &PushRequest<'_>) -> Result<PushReport, TransferError>;
}
