//! Environment profile entity
//!
//! Fully resolved description of one remote deployment target. Built once
//! per run by the resolver and passed by reference to every stage.

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::value_objects::{Environment, SshEndpoint};

/// How container commands are executed on the remote host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Privilege {
    /// The remote user can talk to the docker daemon directly
    #[default]
    User,
    /// Container commands are prefixed with `sudo`
    Sudo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentProfile {
    pub environment: Environment,
    pub host: String,
    pub user: String,
    pub ssh_key: PathBuf,
    pub ssh_port: u16,
    /// Remote base directory, e.g. `/opt/campaigns`
    pub remote_dir: String,
    pub app_port: u16,
    pub cache_port: u16,
    pub image_tag: String,
    pub privilege: Privilege,
    /// Local secrets file pushed as remote `.env`
    pub env_file: PathBuf,
    pub health_path: String,
    pub backup_before_deploy: bool,
}

impl EnvironmentProfile {
    pub fn endpoint(&self, connect_timeout: Duration) -> SshEndpoint {
        SshEndpoint {
            user: self.user.clone(),
            host: self.host.clone(),
            port: self.ssh_port,
            key: self.ssh_key.clone(),
            connect_timeout,
        }
    }

    /// Absolute remote path for a path relative to the base directory.
    pub fn remote_path(&self, rel: &str) -> String {
        let base = self.remote_dir.trim_end_matches('/');
        let rel = rel.trim_start_matches("./").trim_start_matches('/');
        if rel.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, rel)
        }
    }

    /// `user@host` for display
    pub fn target(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}

#[cfg(test)]
pub(crate) fn sample_profile(environment: Environment) -> EnvironmentProfile {
    EnvironmentProfile {
        environment,
        host: "10.0.0.5".to_string(),
        user: "deploy".to_string(),
        ssh_key: PathBuf::from("/keys/id_ed25519"),
        ssh_port: 22,
        remote_dir: "/opt/campaigns/".to_string(),
        app_port: 8000,
        cache_port: 6379,
        image_tag: format!("campaigns-api:{}", environment),
        privilege: Privilege::User,
        env_file: PathBuf::from(format!(".env.{}", environment)),
        health_path: "/health".to_string(),
        backup_before_deploy: environment.backs_up_by_default(),
    }
}
