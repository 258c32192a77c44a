//! Deploy Module
//!
//! Orchestrates `deploy <env>` for the Campaigns API.
//!
//! ## Structure
//!
//! - `options` - Run options (`DeployOptions`, `BackupChoice`)
//! - `result` - Result types (`DeployOutcome`, `DeployReport`)
//! - `use_case` - Core use case logic (`DeployUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use campaign_deploy::application::deploy::{DeployOptions, DeployUseCase};
//!
//! let use_case = DeployUseCase::new(config, root, connector, runner, transfers, lock);
//! let outcome = use_case.execute(&DeployOptions::new(Environment::Homolog))?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::{BackupChoice, DeployOptions};
pub use result::{DeployOutcome, DeployReport};
pub use use_case::DeployUseCase;

#[cfg(test)]
mod tests;
