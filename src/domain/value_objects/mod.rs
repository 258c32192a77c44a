//! Value Objects
//!
//! Immutable types with no identity, compared by value.

mod config_warning;
mod database_state;
mod environment;
mod exclusions;
mod fingerprint;
mod ssh;
mod stage;

pub use config_warning::ConfigWarning;
pub use database_state::{DatabaseState, ProbeOutcome, ProbeReport};
pub use environment::Environment;
pub use exclusions::{ExclusionError, ExclusionList, BUILTIN_EXCLUSIONS, DEFAULT_IGNORE_FILE};
pub use fingerprint::{Fingerprint, FingerprintBuilder};
pub use ssh::SshEndpoint;
pub use stage::Stage;
