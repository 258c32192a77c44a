//! Configuration type definitions

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{ContainerLayout, VolumeMount};
use crate::domain::value_objects::{Environment, DEFAULT_IGNORE_FILE};
use crate::error::{DeployError, DeployResult};

use super::loader;

/// Pipeline timing and retention settings (`[deploy]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploySettings {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Wait after starting containers before the first health probe
    #[serde(default = "default_settle")]
    pub settle_secs: u64,

    #[serde(default = "default_health_retries")]
    pub health_retries: u32,

    #[serde(default = "default_health_interval")]
    pub health_interval_secs: u64,

    /// Backups kept per mode by rotation
    #[serde(default = "default_backup_keep")]
    pub backup_keep: usize,

    #[serde(default = "default_ignore_file")]
    pub ignore_file: String,

    /// Lines of container log captured into a backup
    #[serde(default = "default_log_tail")]
    pub log_tail: usize,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            settle_secs: default_settle(),
            health_retries: default_health_retries(),
            health_interval_secs: default_health_interval(),
            backup_keep: default_backup_keep(),
            ignore_file: default_ignore_file(),
            log_tail: default_log_tail(),
        }
    }
}

impl DeploySettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs)
    }
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_settle() -> u64 {
    10
}

fn default_health_retries() -> u32 {
    3
}

fn default_health_interval() -> u64 {
    5
}

fn default_backup_keep() -> usize {
    5
}

fn default_ignore_file() -> String {
    DEFAULT_IGNORE_FILE.to_string()
}

fn default_log_tail() -> usize {
    2000
}

/// One remote environment (`[environments.<name>]` or `.deploy/<name>.toml`)
///
/// Every field is optional so files can be layered; the resolver decides
/// which are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub host: Option<String>,
    pub user: Option<String>,
    pub ssh_key: Option<PathBuf>,
    pub ssh_port: Option<u16>,
    pub remote_dir: Option<String>,
    pub app_port: Option<u16>,
    pub cache_port: Option<u16>,
    pub image_tag: Option<String>,
    /// Prefix container commands with `sudo`
    pub sudo: Option<bool>,
    pub env_file: Option<PathBuf>,
    pub health_path: Option<String>,
    pub backup_before_deploy: Option<bool>,
}

impl EnvironmentConfig {
    /// Overlay `other` on top of `self`: fields set in `other` win.
    pub fn merge(&mut self, other: EnvironmentConfig) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() { self.$field = other.$field; })*
            };
        }
        take!(
            host,
            user,
            ssh_key,
            ssh_port,
            remote_dir,
            app_port,
            cache_port,
            image_tag,
            sudo,
            env_file,
            health_path,
            backup_before_deploy
        );
    }
}

/// Local development run (`[development]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevelopmentConfig {
    #[serde(default = "default_run_command")]
    pub run_command: String,
}

impl Default for DevelopmentConfig {
    fn default() -> Self {
        Self {
            run_command: default_run_command(),
        }
    }
}

fn default_run_command() -> String {
    "docker compose up --build".to_string()
}

/// Container naming and volumes (`[containers]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainersConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,

    #[serde(default = "default_app_port")]
    pub app_container_port: u16,

    /// `volume:/mount/point` entries
    #[serde(default = "default_app_volumes")]
    pub app_volumes: Vec<String>,

    #[serde(default = "default_static_mount")]
    pub static_mount: String,

    #[serde(default = "default_cache_name")]
    pub cache_name: String,

    #[serde(default = "default_cache_image")]
    pub cache_image: String,

    #[serde(default = "default_cache_port")]
    pub cache_container_port: u16,

    #[serde(default = "default_cache_volumes")]
    pub cache_volumes: Vec<String>,
}

impl Default for ContainersConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            app_container_port: default_app_port(),
            app_volumes: default_app_volumes(),
            static_mount: default_static_mount(),
            cache_name: default_cache_name(),
            cache_image: default_cache_image(),
            cache_container_port: default_cache_port(),
            cache_volumes: default_cache_volumes(),
        }
    }
}

impl ContainersConfig {
    pub fn layout(&self, file: &Path) -> DeployResult<ContainerLayout> {
        Ok(ContainerLayout {
            app_name: self.app_name.clone(),
            app_container_port: self.app_container_port,
            app_volumes: parse_volumes(&self.app_volumes, file)?,
            static_mount: self.static_mount.clone(),
            cache_name: self.cache_name.clone(),
            cache_image: self.cache_image.clone(),
            cache_container_port: self.cache_container_port,
            cache_volumes: parse_volumes(&self.cache_volumes, file)?,
        })
    }
}

fn parse_volumes(entries: &[String], file: &Path) -> DeployResult<Vec<VolumeMount>> {
    entries
        .iter()
        .map(|entry| match entry.split_once(':') {
            Some((volume, target))
                if !volume.is_empty() && !volume.contains('/') && target.starts_with('/') =>
            {
                Ok(VolumeMount {
                    volume: volume.to_string(),
                    target: target.to_string(),
                })
            }
            _ => Err(DeployError::InvalidConfig {
                file: file.to_path_buf(),
                message: format!(
                    "volume entry '{}' must look like 'name:/absolute/path'",
                    entry
                ),
            }),
        })
        .collect()
}

fn default_app_name() -> String {
    "campaigns-api".to_string()
}

fn default_app_port() -> u16 {
    8000
}

fn default_app_volumes() -> Vec<String> {
    vec!["campaigns_logs:/app/logs".to_string()]
}

fn default_static_mount() -> String {
    "/app/static".to_string()
}

fn default_cache_name() -> String {
    "campaigns-redis".to_string()
}

fn default_cache_image() -> String {
    "redis:7-alpine".to_string()
}

fn default_cache_port() -> u16 {
    6379
}

fn default_cache_volumes() -> Vec<String> {
    vec!["campaigns_redis_data:/data".to_string()]
}

/// Commands run inside throwaway app containers (`[migrations]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationsConfig {
    /// Prints a JSON database report as its last line
    #[serde(default = "default_probe_command")]
    pub probe_command: String,

    #[serde(default = "default_upgrade_command")]
    pub upgrade_command: String,

    #[serde(default = "default_seed_command")]
    pub seed_command: String,

    /// Image providing `pg_dump` for backups
    #[serde(default = "default_dump_image")]
    pub dump_image: String,
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            probe_command: default_probe_command(),
            upgrade_command: default_upgrade_command(),
            seed_command: default_seed_command(),
            dump_image: default_dump_image(),
        }
    }
}

fn default_probe_command() -> String {
    "python scripts/check_database.py".to_string()
}

fn default_upgrade_command() -> String {
    "alembic upgrade head".to_string()
}

fn default_seed_command() -> String {
    "python scripts/seed_data.py".to_string()
}

fn default_dump_image() -> String {
    "postgres:16-alpine".to_string()
}

/// Complete `deploy.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub deploy: DeploySettings,

    /// Keyed by canonical environment name after loading
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentConfig>,

    #[serde(default)]
    pub development: DevelopmentConfig,

    #[serde(default)]
    pub containers: ContainersConfig,

    #[serde(default)]
    pub migrations: MigrationsConfig,
}

impl Config {
    /// Load a single file without overlays or environment overrides.
    pub fn load(path: &Path) -> DeployResult<Self> {
        loader::load_with_warnings(path).map(|(config, _)| config)
    }

    pub fn environment(&self, environment: Environment) -> Option<&EnvironmentConfig> {
        self.environments.get(environment.as_str())
    }

    pub fn environment_mut(&mut self, environment: Environment) -> &mut EnvironmentConfig {
        self.environments
            .entry(environment.as_str().to_string())
            .or_default()
    }
}
