//! Deploy Options

use crate::domain::value_objects::Environment;

/// Whether a backup runs before the transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackupChoice {
    /// The environment's `backup_before_deploy` setting decides
    #[default]
    Auto,
    /// `--backup`
    Force,
    /// `--no-backup`
    Skip,
}

impl BackupChoice {
    pub fn from_flags(backup: bool, no_backup: bool) -> Self {
        match (backup, no_backup) {
            (true, _) => BackupChoice::Force,
            (false, true) => BackupChoice::Skip,
            (false, false) => BackupChoice::Auto,
        }
    }

    pub fn should_run(&self, profile_default: bool) -> bool {
        match self {
            BackupChoice::Auto => profile_default,
            BackupChoice::Force => true,
            BackupChoice::Skip => false,
        }
    }
}

/// Options for the deploy use case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOptions {
    pub environment: Environment,
    pub backup: BackupChoice,
    /// Resolve, check connectivity and plan; mutate nothing
    pub dry_run: bool,
}

impl DeployOptions {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            backup: BackupChoice::Auto,
            dry_run: false,
        }
    }

    pub fn with_backup(mut self, backup: BackupChoice) -> Self {
        self.backup = backup;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
