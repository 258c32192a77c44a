//! Domain Services
//!
//! Pure business logic services that operate on domain entities.
//! These services have no I/O dependencies and are easily testable.

pub mod classifier;
pub mod docker;
pub mod health;
pub mod migration_plan;
pub mod rotation;
pub mod shell;

pub use classifier::classify;
pub use docker::DockerCommands;
pub use migration_plan::{MigrationAction, MigrationStep};
pub use rotation::select_expired;
