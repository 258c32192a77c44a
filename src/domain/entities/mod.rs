//! Domain Entities
//!
//! - `EnvironmentProfile` - resolved deployment target
//! - `TransferManifest` - what gets pushed, what never does
//! - `ContainerSet` - service containers and their volumes
//! - `BackupManifest` - record of one backup run

mod backup;
mod containers;
mod manifest;
pub(crate) mod profile;

pub use backup::{BackupManifest, BackupMode, VolumeArchive};
pub use containers::{BindMount, ContainerLayout, ContainerSet, ContainerSpec, VolumeMount};
pub use manifest::{
    Artifact, TransferManifest, OPTIONAL_PATHS, REMOTE_ENV_FILE, REQUIRED_PATHS,
};
pub use profile::{EnvironmentProfile, Privilege};

#[cfg(test)]
pub(crate) use containers::sample_layout;
#[cfg(test)]
pub(crate) use profile::sample_profile;
