use campaign_deploy::{DeployError, Environment};

use crate::ui::context::UiContext;
use crate::ui::log;

/// Where a failed run was aimed.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub command: &'static str,
    pub environment: Option<Environment>,
    pub host: Option<String>,
}

impl ErrorContext {
    pub fn new(command: &'static str) -> Self {
        Self {
            command,
            ..Self::default()
        }
    }

    fn describe(&self) -> String {
        match (&self.environment, &self.host) {
            (Some(env), Some(host)) => format!("{} {} ({})", self.command, env, host),
            (Some(env), None) => format!("{} {}", self.command, env),
            _ => self.command.to_string(),
        }
    }
}

/// Operator-facing message for a failure: stage, target, cause.
pub fn format_error(err: &anyhow::Error, ctx: &ErrorContext) -> String {
    match err.downcast_ref::<DeployError>() {
        Some(deploy) => format!(
            "{} failed at stage '{}': {}",
            ctx.describe(),
            deploy.stage(),
            deploy
        ),
        None => format!("{} failed: {:#}", ctx.describe(), err),
    }
}

pub fn print_error(err: &anyhow::Error, ctx: &ErrorContext, ui: &UiContext) {
    if ui.json {
        let mut output = serde_json::json!({
            "event": "error",
            "command": ctx.command,
            "message": err.to_string(),
        });
        if let Some(deploy) = err.downcast_ref::<DeployError>() {
            output["stage"] = deploy.stage().as_str().into();
        }
        if let Some(env) = ctx.environment {
            output["environment"] = env.as_str().into();
        }
        let _ = crate::ui::json::emit(output);
        return;
    }

    let message = format_error(err, ctx);
    if ui.caps.is_ci && std::env::var("GITHUB_ACTIONS").is_ok() {
        eprintln!("::error::{}", message);
    }
    log::error(ui, &message);
}
