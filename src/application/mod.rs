//! Application Layer
//!
//! Use cases that orchestrate a run.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeployUseCase` - `deploy <env>`: resolve, transfer, build, migrate, replace, verify
//! - `BackupUseCase` - `backup <env> <mode>`
//!
//! ## Stages
//!
//! - `resolve` - Environment profile resolution
//! - `transfer` - Transfer planning and execution
//! - `migrations` - Database classification and migration dispatch
//! - `containers` - Container replacement and health polling
//! - `remote_lock` - Per-environment lock on the remote host

pub mod backup;
pub mod containers;
pub mod deploy;
pub mod migrations;
pub(crate) mod remote;
pub mod remote_lock;
pub mod resolve;
pub(crate) mod session;
pub mod transfer;

#[cfg(test)]
pub(crate) mod testing;

pub use backup::{BackupOutcome, BackupUseCase};
pub use containers::{HealthOutcome, HealthPolicy};
pub use deploy::{BackupChoice, DeployOptions, DeployOutcome, DeployReport, DeployUseCase};
pub use resolve::{resolve, resolve_profile, LocalRun, Resolution};
pub use transfer::{plan_for_profile, plan_transfer, ArtifactPlan, TransferPlan};
