//! campaign-deploy - deploy orchestrator for the Campaigns/Feed API
//!
//! Pushes the application tree to a remote Docker host over SSH without ever
//! touching runtime-managed data (`static/`), brings the database schema to
//! head with exactly the action its state calls for, and replaces the
//! service containers in dependency order.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{
    BackupChoice, BackupOutcome, BackupUseCase, DeployOptions, DeployOutcome, DeployReport,
    DeployUseCase,
};
pub use config::{Config, ConfigWarning};
pub use domain::entities::{BackupMode, EnvironmentProfile};
pub use domain::value_objects::{DatabaseState, Environment, Stage};
pub use error::{DeployError, DeployResult, EXIT_DEGRADED, EXIT_FATAL, EXIT_OK};
