//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating use cases with infrastructure dependencies
//!
//! ## Structure
//!
//! - `cli` - Command-line definition
//! - `factory` - Creates use cases with proper dependencies (dependency injection)
//!
//! ## Usage
//!
//! ```ignore
//! use campaign_deploy::presentation::factory;
//!
//! // Create deploy use case with all dependencies wired up
//! let use_case = factory::create_deploy_use_case(config, &root, events);
//! let outcome = use_case.execute(&options)?;
//! ```

pub mod cli;
pub mod factory;

pub use cli::{BackupModeArg, Cli, ColorWhen, Commands};
pub use factory::{create_backup_use_case, create_deploy_use_case};
