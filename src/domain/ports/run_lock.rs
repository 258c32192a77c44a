//! Run Lock Port
//!
//! At most one deploy per environment from this checkout. The guard releases
//! the lock when dropped.

use thiserror::Error;

use crate::domain::value_objects::Environment;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LockError {
    #[error("held by {holder}")]
    Held { holder: String },
    #[error("lock unavailable: {0}")]
    Access(String),
}

/// Marker for a held lock; dropping it releases the lock.
pub trait LockGuard: Send {}

pub trait RunLock: Send + Sync {
    fn acquire(&self, environment: Environment) -> Result<Box<dyn LockGuard>, LockError>;
}
