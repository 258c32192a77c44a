//! `plan [environment]`: the transfer a deploy would perform, offline.

use anyhow::Result;

use campaign_deploy::application::{plan_for_profile, resolve_profile, TransferPlan};
use campaign_deploy::{DeployError, EnvironmentProfile, EXIT_OK};

use super::{finish, load_config, note_host, parse_environment, project_root, GlobalOptions};
use crate::ui::context::UiContext;
use crate::ui::error::ErrorContext;
use crate::ui::log;
use crate::ui::theme::{colors, paint, Level};

pub fn cmd_plan(environment: &str, global: &GlobalOptions) -> i32 {
    let mut ctx = ErrorContext::new("plan");
    let result = run(environment, global, &mut ctx);
    finish(result, &ctx, &global.ui)
}

fn run(environment: &str, global: &GlobalOptions, ctx: &mut ErrorContext) -> Result<i32> {
    let ui = &global.ui;
    let environment = parse_environment(environment, ctx)?;
    if !environment.is_remote() {
        return Err(DeployError::Unsupported {
            environment,
            operation: "plan",
        }
        .into());
    }

    let root = project_root()?;
    let loaded = load_config(&root, global)?;
    note_host(&loaded, environment, ctx);

    let profile = resolve_profile(&loaded.config, environment, &root)?;
    let plan = plan_for_profile(&root, &profile, &loaded.config.deploy.ignore_file)?;
    let bytes = plan.total_bytes(&root);

    if ui.json {
        let _ = crate::ui::json::emit(plan_json(&profile, &plan, bytes));
    } else {
        print_plan(&profile, &plan, bytes, ui);
    }
    Ok(EXIT_OK)
}

fn plan_json(profile: &EnvironmentProfile, plan: &TransferPlan, bytes: u64) -> serde_json::Value {
    let artifacts: Vec<_> = plan
        .artifacts
        .iter()
        .map(|a| {
            serde_json::json!({
                "source": a.artifact.source.display().to_string(),
                "destination": a.artifact.destination.display().to_string(),
                "required": a.artifact.required,
                "files": a.files,
                "skipped": a.skipped,
                "mirrored": a.directory,
            })
        })
        .collect();
    let excluded: Vec<_> = plan
        .excluded
        .iter()
        .map(|p| p.display().to_string())
        .collect();

    serde_json::json!({
        "event": "plan",
        "command": "plan",
        "environment": profile.environment.as_str(),
        "target": profile.target(),
        "remote_dir": profile.remote_dir,
        "files": plan.files.len(),
        "bytes": bytes,
        "fingerprint": plan.fingerprint.to_string(),
        "artifacts": artifacts,
        "excluded": excluded,
        "warnings": plan.warnings,
    })
}

fn print_plan(profile: &EnvironmentProfile, plan: &TransferPlan, bytes: u64, ui: &UiContext) {
    log::info(
        ui,
        &format!(
            "transfer plan for {} ({}:{})",
            profile.environment,
            profile.target(),
            profile.remote_dir
        ),
    );

    for artifact in &plan.artifacts {
        let name = if artifact.artifact.source == artifact.artifact.destination {
            artifact.artifact.source.display().to_string()
        } else {
            format!(
                "{} -> {}",
                artifact.artifact.source.display(),
                artifact.artifact.destination.display()
            )
        };
        match &artifact.skipped {
            Some(reason) => println!(
                "  {} {} ({})",
                paint(Level::Warning.icon(ui.unicode), colors::WARNING, ui.color),
                name,
                reason
            ),
            None => println!(
                "  {} {} ({} files)",
                paint(Level::Success.icon(ui.unicode), colors::SUCCESS, ui.color),
                name,
                artifact.files
            ),
        }
    }

    for path in &plan.excluded {
        println!(
            "  {} withheld {}",
            paint(Level::Dim.icon(ui.unicode), colors::DIM, ui.color),
            path.display()
        );
    }
    for warning in &plan.warnings {
        log::warning(ui, warning);
    }

    log::success(
        ui,
        &format!(
            "{} files, {} bytes, {} withheld (plan {})",
            plan.files.len(),
            bytes,
            plan.excluded.len(),
            plan.fingerprint.short()
        ),
    );
}
