//! Backup manifest entity
//!
//! Record of what one backup run captured. Written next to the backup on the
//! remote host and copied locally for the operator; nothing reads it back
//! automatically.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Environment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackupMode {
    /// Data plus logs plus a copy of the deployment configuration
    Full,
    /// Database dump, volumes and static data only
    DataOnly,
}

impl BackupMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupMode::Full => "full",
            BackupMode::DataOnly => "data-only",
        }
    }

    pub fn includes_config(&self) -> bool {
        matches!(self, BackupMode::Full)
    }
}

impl fmt::Display for BackupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackupMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(BackupMode::Full),
            "data-only" | "data_only" | "data" => Ok(BackupMode::DataOnly),
            other => Err(format!(
                "invalid backup mode '{}' (expected full or data-only)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupManifest {
    pub id: String,
    pub environment: Environment,
    pub mode: BackupMode,
    pub created_at: DateTime<Utc>,
    pub host: String,
    /// Remote directory holding every file below
    pub directory: String,
    pub database_dump: Option<String>,
    #[serde(default)]
    pub volume_archives: Vec<VolumeArchive>,
    pub static_archive: Option<String>,
    #[serde(default)]
    pub container_logs: Vec<String>,
    pub config_copy: Option<String>,
    /// Output of `du -sh` for the backup directory
    pub disk_usage: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeArchive {
    pub volume: String,
    pub archive: String,
}

impl BackupManifest {
    /// Backup id: sortable timestamp plus mode, e.g. `20261014_093000-full`.
    pub fn make_id(created_at: DateTime<Utc>, mode: BackupMode) -> String {
        format!("{}-{}", created_at.format("%Y%m%d_%H%M%S"), mode.as_str())
    }

    pub fn new(
        environment: Environment,
        mode: BackupMode,
        created_at: DateTime<Utc>,
        host: impl Into<String>,
        backups_root: &str,
    ) -> Self {
        let id = Self::make_id(created_at, mode);
        let directory = format!("{}/{}", backups_root.trim_end_matches('/'), id);
        Self {
            id,
            environment,
            mode,
            created_at,
            host: host.into(),
            directory,
            database_dump: None,
            volume_archives: Vec::new(),
            static_archive: None,
            container_logs: Vec::new(),
            config_copy: None,
            disk_usage: None,
        }
    }

    /// Path of a file inside the backup directory.
    pub fn file(&self, name: &str) -> String {
        format!("{}/{}", self.directory, name)
    }
}
