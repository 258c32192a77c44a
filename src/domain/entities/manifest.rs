//! Transfer manifest entity
//!
//! The paths a deploy pushes to the remote base directory, and the exclusion
//! list that overrides them.

use std::path::{Path, PathBuf};

use crate::domain::value_objects::ExclusionList;

/// One local path pushed to one remote location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path relative to the project root
    pub source: PathBuf,
    /// Path relative to the remote base directory
    pub destination: PathBuf,
    /// Required artifacts abort the run when missing or when their push fails
    pub required: bool,
}

impl Artifact {
    pub fn required(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            destination: path.clone(),
            source: path,
            required: true,
        }
    }

    pub fn optional(path: impl Into<PathBuf>) -> Self {
        Self {
            required: false,
            ..Self::required(path)
        }
    }

    pub fn renamed(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = destination.into();
        self
    }
}

/// Required files and directories of the application, in push order.
pub const REQUIRED_PATHS: &[&str] = &[
    "app",
    "migrations",
    "scripts",
    "requirements.txt",
    "Dockerfile",
    "docker-compose.yml",
    "alembic.ini",
];

/// Directories whose absence is tolerated.
pub const OPTIONAL_PATHS: &[&str] = &["repo"];

/// Canonical remote name of the environment secrets file
pub const REMOTE_ENV_FILE: &str = ".env";

#[derive(Debug, Clone)]
pub struct TransferManifest {
    artifacts: Vec<Artifact>,
    exclusions: ExclusionList,
}

impl TransferManifest {
    pub fn new(artifacts: Vec<Artifact>, exclusions: ExclusionList) -> Self {
        Self {
            artifacts,
            exclusions,
        }
    }

    /// The fixed artifact set, with `env_file` mapped to the remote `.env`.
    pub fn standard(env_file: &Path, exclusions: ExclusionList) -> Self {
        let mut artifacts: Vec<Artifact> =
            REQUIRED_PATHS.iter().map(|p| Artifact::required(*p)).collect();
        artifacts.push(Artifact::required(env_file).renamed(REMOTE_ENV_FILE));
        artifacts.extend(OPTIONAL_PATHS.iter().map(|p| Artifact::optional(*p)));
        Self::new(artifacts, exclusions)
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn exclusions(&self) -> &ExclusionList {
        &self.exclusions
    }
}
