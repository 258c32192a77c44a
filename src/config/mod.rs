//! Configuration module
//!
//! Configuration hierarchy, highest priority first:
//! 1. Environment variables (`CAMPAIGN_DEPLOY_<ENV>_*`)
//! 2. Credential overlays (`.deploy/<env>.toml`)
//! 3. Project config (`deploy.toml`, or `--config <path>`)
//! 4. Built-in defaults

mod env_validator;
mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use loader::{
    apply_env_overrides, load_project, load_with_warnings, overlay_path, with_env_overrides,
    LoadedConfig, CONFIG_FILE, STATE_DIR,
};
pub use types::{
    Config, ContainersConfig, DeploySettings, DevelopmentConfig, EnvironmentConfig,
    MigrationsConfig,
};
