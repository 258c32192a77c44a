//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - Global flags (--json, --color, --verbose, --config) are inherited by all subcommands
//! - Environment names are parsed by the library so an unknown name is
//!   reported like every other resolution failure

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::entities::BackupMode;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupModeArg {
    /// Database, volumes, static data, logs and deployment config
    Full,
    /// Database, volumes and static data only
    DataOnly,
}

impl From<BackupModeArg> for BackupMode {
    fn from(mode: BackupModeArg) -> Self {
        match mode {
            BackupModeArg::Full => BackupMode::Full,
            BackupModeArg::DataOnly => BackupMode::DataOnly,
        }
    }
}

/// campaign-deploy - deploy the Campaigns/Feed API to its Docker hosts
#[derive(Parser, Debug)]
#[command(name = "campaign-deploy")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Environments: development, homolog (default), production.")]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorWhen>,

    /// Verbosity level (-v prints remote commands)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (default: ./deploy.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy the application to an environment
    Deploy {
        /// Target environment
        #[arg(default_value = "homolog")]
        environment: String,

        /// Take a full backup before deploying (default only for production)
        #[arg(long, conflicts_with = "no_backup")]
        backup: bool,

        /// Skip the automatic pre-deploy backup
        #[arg(long)]
        no_backup: bool,

        /// Dry run - resolve, plan and check connectivity without changing the host
        #[arg(long)]
        dry_run: bool,

        /// Skip the production confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Back up a deployed environment
    Backup {
        /// Target environment
        environment: String,

        /// What to capture
        #[arg(value_enum)]
        mode: BackupModeArg,
    },

    /// Show what a deploy would transfer and what it withholds (no network)
    Plan {
        /// Target environment
        #[arg(default_value = "homolog")]
        environment: String,
    },
}
