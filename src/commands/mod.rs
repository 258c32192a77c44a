//! Subcommand entry points.
//!
//! Each command loads the project configuration, runs one use case and
//! returns the process exit code. Failures are rendered here, where the
//! targeted environment and host are known.

pub mod backup;
pub mod deploy;
pub mod plan;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use campaign_deploy::config::{load_project, LoadedConfig};
use campaign_deploy::domain::ports::DeployEventSink;
use campaign_deploy::infrastructure::JsonEventSink;
use campaign_deploy::{DeployError, Environment, EXIT_FATAL};

use crate::ui::console::ConsoleEventSink;
use crate::ui::context::UiContext;
use crate::ui::error::{print_error, ErrorContext};
use crate::ui::output::print_config_warnings;

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub ui: UiContext,
    pub config: Option<PathBuf>,
}

/// Project root: the working directory the operator runs from.
pub fn project_root() -> Result<PathBuf> {
    std::env::current_dir().context("cannot determine the working directory")
}

/// Load `deploy.toml` plus overlays and print unknown-key warnings.
pub fn load_config(root: &Path, global: &GlobalOptions) -> Result<LoadedConfig> {
    let loaded = load_project(root, global.config.as_deref())?;
    print_config_warnings(&loaded.warnings, &global.ui);
    Ok(loaded)
}

/// Parse an environment name and record it in the error context.
pub fn parse_environment(value: &str, ctx: &mut ErrorContext) -> Result<Environment> {
    let environment: Environment = value.parse()?;
    ctx.environment = Some(environment);
    Ok(environment)
}

/// Record the configured host of `environment` in the error context.
pub fn note_host(loaded: &LoadedConfig, environment: Environment, ctx: &mut ErrorContext) {
    ctx.host = loaded
        .config
        .environment(environment)
        .and_then(|section| section.host.clone())
        .filter(|h| !h.is_empty());
}

pub fn event_sink(ui: &UiContext, command: &'static str) -> Arc<dyn DeployEventSink> {
    if ui.json {
        Arc::new(JsonEventSink::stdout(command))
    } else {
        Arc::new(ConsoleEventSink::stdout(*ui))
    }
}

/// Exit code for a failed command.
pub fn exit_code_of(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<DeployError>()
        .map(DeployError::exit_code)
        .unwrap_or(EXIT_FATAL)
}

/// Render `result`'s error and turn it into an exit code.
pub fn finish(result: Result<i32>, ctx: &ErrorContext, ui: &UiContext) -> i32 {
    match result {
        Ok(code) => code,
        Err(err) => {
            print_error(&err, ctx, ui);
            exit_code_of(&err)
        }
    }
}
