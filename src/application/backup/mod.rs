//! Backup Module
//!
//! Captures the database, named volumes, `static/`, container logs and (for
//! full backups) the deployed configuration into
//! `<remote_dir>/backups/<id>/`, then rotates old backups.
//!
//! - `capture` - The backup steps against an open shell (used by deploy)
//! - `use_case` - Standalone `backup <env> <mode>` flow

mod capture;
mod use_case;

pub use capture::{local_backup_dir, run_backup, BackupOutcome, BackupRequest, BACKUPS_DIR};
pub use use_case::BackupUseCase;
