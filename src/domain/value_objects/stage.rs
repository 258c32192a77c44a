//! Pipeline stage value object
//!
//! Every error and warning is attributed to the stage that produced it, so
//! the operator never sees a bare "deploy failed".

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Resolve,
    Connect,
    Lock,
    Backup,
    Transfer,
    Build,
    Classify,
    Migrate,
    Containers,
    Health,
    LocalRun,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Resolve => "resolve",
            Stage::Connect => "connect",
            Stage::Lock => "lock",
            Stage::Backup => "backup",
            Stage::Transfer => "transfer",
            Stage::Build => "build",
            Stage::Classify => "classify",
            Stage::Migrate => "migrate",
            Stage::Containers => "containers",
            Stage::Health => "health",
            Stage::LocalRun => "local-run",
        }
    }

    /// Human-readable label used in stage headers.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Resolve => "Resolving environment",
            Stage::Connect => "Checking connectivity",
            Stage::Lock => "Acquiring deploy lock",
            Stage::Backup => "Creating backup",
            Stage::Transfer => "Transferring files",
            Stage::Build => "Building image",
            Stage::Classify => "Inspecting database",
            Stage::Migrate => "Applying migrations",
            Stage::Containers => "Replacing containers",
            Stage::Health => "Verifying health",
            Stage::LocalRun => "Starting local environment",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
