//! Configuration loading
//!
//! `deploy.toml` at the project root, then `.deploy/<env>.toml` overlays,
//! then `CAMPAIGN_DEPLOY_<ENV>_*` environment variables. Environment
//! variables are read here and nowhere else.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::domain::value_objects::{ConfigWarning, Environment};
use crate::error::{DeployError, DeployResult};

use super::env_validator::{closest, EnvVarValidator};
use super::types::{Config, EnvironmentConfig};

/// Default config file name at the project root
pub const CONFIG_FILE: &str = "deploy.toml";

/// Local state directory (overlays, locks, backup manifests)
pub const STATE_DIR: &str = ".deploy";

/// Result of loading the project configuration.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub warnings: Vec<ConfigWarning>,
    /// Files that contributed, in load order
    pub sources: Vec<PathBuf>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> DeployResult<(Config, Vec<ConfigWarning>)> {
    let (mut config, mut warnings) = parse_file::<Config>(path)?;
    warnings.extend(normalize_environments(&mut config, path));
    Ok((config, warnings))
}

/// Load `deploy.toml` (or `explicit`), overlays and env overrides.
///
/// A missing default file yields built-in defaults; a missing explicit file
/// is an error.
pub fn load_project(project_root: &Path, explicit: Option<&Path>) -> DeployResult<LoadedConfig> {
    let path = match explicit {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => project_root.join(p),
        None => project_root.join(CONFIG_FILE),
    };

    let mut sources = Vec::new();
    let (mut config, mut warnings) = if path.exists() {
        sources.push(path.clone());
        load_with_warnings(&path)?
    } else if explicit.is_some() {
        return Err(DeployError::InvalidConfig {
            file: path,
            message: "file not found".to_string(),
        });
    } else {
        (Config::default(), Vec::new())
    };

    for environment in Environment::ALL.into_iter().filter(Environment::is_remote) {
        let overlay_path = overlay_path(project_root, environment);
        if !overlay_path.exists() {
            continue;
        }
        let (overlay, overlay_warnings) = parse_file::<EnvironmentConfig>(&overlay_path)?;
        config.environment_mut(environment).merge(overlay);
        warnings.extend(overlay_warnings);
        sources.push(overlay_path);
    }

    Ok(LoadedConfig {
        config: with_env_overrides(config),
        warnings,
        sources,
    })
}

/// Path of the per-environment overlay written by credential setup.
pub fn overlay_path(project_root: &Path, environment: Environment) -> PathBuf {
    project_root
        .join(STATE_DIR)
        .join(format!("{}.toml", environment.as_str()))
}

/// Apply environment variable overrides (CAMPAIGN_DEPLOY_<ENV>_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// `with_env_overrides` with an injectable lookup.
pub fn apply_env_overrides<F>(mut config: Config, get_env: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    for environment in Environment::ALL.into_iter().filter(Environment::is_remote) {
        let prefix = environment.env_prefix();
        let var = |suffix: &str| {
            get_env(&format!("{}{}", prefix, suffix)).filter(|v| !v.trim().is_empty())
        };

        let mut overlay = EnvironmentConfig {
            host: var("HOST"),
            user: var("USER"),
            ssh_key: var("SSH_KEY").map(PathBuf::from),
            remote_dir: var("REMOTE_DIR"),
            ..Default::default()
        };

        if let Some(port) = var("SSH_PORT") {
            let name = format!("{}SSH_PORT", prefix);
            let validator = EnvVarValidator::new(&name, &["1-65535"]);
            overlay.ssh_port = validator.parse(&port, |s| s.trim().parse().ok().map(Some), None);
        }

        if let Some(sudo) = var("SUDO") {
            let name = format!("{}SUDO", prefix);
            let validator = EnvVarValidator::new(&name, &["true", "false"]);
            overlay.sudo = validator.parse(&sudo, parse_bool, None);
        }

        if overlay != EnvironmentConfig::default() {
            config.environment_mut(environment).merge(overlay);
        }
    }
    config
}

fn parse_bool(value: &str) -> Option<Option<bool>> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(Some(true)),
        "false" | "0" | "no" => Some(Some(false)),
        _ => None,
    }
}

fn parse_file<T: DeserializeOwned>(path: &Path) -> DeployResult<(T, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let value: T = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| DeployError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|key| {
            let leaf = key.split('.').next_back().unwrap_or(key.as_str()).to_string();
            ConfigWarning {
                line: find_line_number(&content, &leaf),
                suggestion: suggest(&leaf, KNOWN_KEYS),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect();

    Ok((value, warnings))
}

/// Rewrite `[environments.*]` keys to canonical names; unknown names become
/// warnings and are dropped.
fn normalize_environments(config: &mut Config, path: &Path) -> Vec<ConfigWarning> {
    let content = fs::read_to_string(path).unwrap_or_default();
    let raw = std::mem::take(&mut config.environments);
    let mut warnings = Vec::new();

    for (name, section) in raw {
        match name.parse::<Environment>() {
            Ok(environment) => config.environment_mut(environment).merge(section),
            Err(_) => {
                let names: Vec<&str> = Environment::ALL.iter().map(Environment::as_str).collect();
                warnings.push(ConfigWarning {
                    key: format!("environments.{}", name),
                    file: path.to_path_buf(),
                    line: find_line_number(&content, &format!("environments.{}", name)),
                    suggestion: suggest(&name, &names),
                });
            }
        }
    }
    warnings
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

const KNOWN_KEYS: &[&str] = &[
    "deploy",
    "connect_timeout_secs",
    "settle_secs",
    "health_retries",
    "health_interval_secs",
    "backup_keep",
    "ignore_file",
    "log_tail",
    "environments",
    "host",
    "user",
    "ssh_key",
    "ssh_port",
    "remote_dir",
    "app_port",
    "cache_port",
    "image_tag",
    "sudo",
    "env_file",
    "health_path",
    "backup_before_deploy",
    "development",
    "run_command",
    "containers",
    "app_name",
    "app_container_port",
    "app_volumes",
    "static_mount",
    "cache_name",
    "cache_image",
    "cache_container_port",
    "cache_volumes",
    "migrations",
    "probe_command",
    "upgrade_command",
    "seed_command",
    "dump_image",
];

fn suggest(unknown: &str, candidates: &[&str]) -> Option<String> {
    closest(unknown, candidates).map(str::to_string)
}
