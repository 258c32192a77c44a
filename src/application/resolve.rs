//! Environment resolution
//!
//! Turns an environment name plus loaded configuration into either a local
//! run or a complete `EnvironmentProfile`. Every precondition that can be
//! checked without touching the network is checked here.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::domain::entities::{EnvironmentProfile, Privilege};
use crate::domain::value_objects::Environment;
use crate::error::{DeployError, DeployResult};

/// Development is handed to a local command instead of being deployed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRun {
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Local(LocalRun),
    Remote(EnvironmentProfile),
}

/// Resolve `environment` against `config`.
///
/// Remote environments need `host`, `user`, `ssh_key` and `remote_dir`;
/// every missing one is reported at once. The ssh key must exist locally.
pub fn resolve(config: &Config, environment: Environment, project_root: &Path) -> DeployResult<Resolution> {
    if !environment.is_remote() {
        return Ok(Resolution::Local(LocalRun {
            command: config.development.run_command.clone(),
        }));
    }

    let profile = resolve_profile(config, environment, project_root)?;
    if !profile.ssh_key.is_file() {
        return Err(DeployError::MissingCredential {
            environment,
            path: profile.ssh_key.clone(),
        });
    }
    Ok(Resolution::Remote(profile))
}

/// Build the profile without checking the ssh key (used by `plan`).
pub fn resolve_profile(
    config: &Config,
    environment: Environment,
    project_root: &Path,
) -> DeployResult<EnvironmentProfile> {
    let section = config.environment(environment).cloned().unwrap_or_default();

    let mut missing = Vec::new();
    let host = non_empty(section.host, "host", &mut missing);
    let user = non_empty(section.user, "user", &mut missing);
    let remote_dir = non_empty(section.remote_dir, "remote_dir", &mut missing);
    let ssh_key = section.ssh_key.filter(|p| !p.as_os_str().is_empty());
    if ssh_key.is_none() {
        missing.push("ssh_key".to_string());
    }
    missing.sort();

    let (Some(host), Some(user), Some(remote_dir), Some(ssh_key), true) =
        (host, user, remote_dir, ssh_key, missing.is_empty())
    else {
        return Err(DeployError::IncompleteConfiguration {
            environment,
            missing,
        });
    };

    if !remote_dir.starts_with('/') || remote_dir.trim_end_matches('/').is_empty() {
        return Err(DeployError::IncompleteConfiguration {
            environment,
            missing: vec![format!("remote_dir (absolute, not '/': got '{}')", remote_dir)],
        });
    }

    Ok(EnvironmentProfile {
        environment,
        host,
        user,
        ssh_key: expand_path(&ssh_key, project_root),
        ssh_port: section.ssh_port.unwrap_or(22),
        remote_dir: remote_dir.trim_end_matches('/').to_string(),
        app_port: section.app_port.unwrap_or(config.containers.app_container_port),
        cache_port: section
            .cache_port
            .unwrap_or(config.containers.cache_container_port),
        image_tag: section
            .image_tag
            .unwrap_or_else(|| format!("{}:{}", config.containers.app_name, environment)),
        privilege: if section.sudo.unwrap_or(false) {
            Privilege::Sudo
        } else {
            Privilege::User
        },
        env_file: section
            .env_file
            .unwrap_or_else(|| PathBuf::from(format!(".env.{}", environment))),
        health_path: section.health_path.unwrap_or_else(|| "/health".to_string()),
        backup_before_deploy: section
            .backup_before_deploy
            .unwrap_or_else(|| environment.backs_up_by_default()),
    })
}

fn non_empty(value: Option<String>, name: &str, missing: &mut Vec<String>) -> Option<String> {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(v) => Some(v),
        None => {
            missing.push(name.to_string());
            None
        }
    }
}

/// Expand `~/` and anchor relative paths at the project root.
pub fn expand_path(path: &Path, project_root: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
