//! Environment value object - which deployment target a run addresses
//!
//! - `Development`: the operator's machine, handled by a local run command
//! - `Homolog`: the staging host
//! - `Production`: the live host serving the tablets

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeployError;

/// Deployment environment (closed set)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    /// Default target when none is given on the command line
    #[default]
    Homolog,
    Production,
}

impl Environment {
    /// All environments, in promotion order.
    pub const ALL: [Environment; 3] = [
        Environment::Development,
        Environment::Homolog,
        Environment::Production,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Homolog => "homolog",
            Environment::Production => "production",
        }
    }

    /// Returns true if this environment is deployed over SSH.
    pub fn is_remote(&self) -> bool {
        !matches!(self, Environment::Development)
    }

    /// Returns true if a backup runs before every deploy unless disabled.
    pub fn backs_up_by_default(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Prefix for environment-variable overrides, e.g. `CAMPAIGN_DEPLOY_HOMOLOG_`.
    pub fn env_prefix(&self) -> String {
        format!("CAMPAIGN_DEPLOY_{}_", self.as_str().to_uppercase())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "homolog" | "hml" | "staging" => Ok(Environment::Homolog),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(DeployError::InvalidEnvironment {
                value: s.to_string(),
            }),
        }
    }
}
