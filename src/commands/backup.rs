//! `backup <environment> <full|data-only>`

use anyhow::Result;

use campaign_deploy::presentation::factory::create_backup_use_case;
use campaign_deploy::{BackupMode, BackupOutcome, EXIT_OK};

use super::{event_sink, finish, load_config, note_host, parse_environment, project_root, GlobalOptions};
use crate::ui::error::ErrorContext;
use crate::ui::log;

pub fn cmd_backup(environment: &str, mode: BackupMode, global: &GlobalOptions) -> i32 {
    let mut ctx = ErrorContext::new("backup");
    let result = run(environment, mode, global, &mut ctx);
    finish(result, &ctx, &global.ui)
}

fn run(environment: &str, mode: BackupMode, global: &GlobalOptions, ctx: &mut ErrorContext) -> Result<i32> {
    let ui = &global.ui;
    let environment = parse_environment(environment, ctx)?;
    let root = project_root()?;
    let loaded = load_config(&root, global)?;
    note_host(&loaded, environment, ctx);

    let use_case = create_backup_use_case(loaded.config, &root, event_sink(ui, "backup"));
    let outcome = use_case.execute(environment, mode)?;

    if ui.json {
        let summary = match &outcome {
            BackupOutcome::Created {
                manifest,
                local_copy,
                warnings,
                ..
            } => serde_json::json!({
                "event": "complete",
                "command": "backup",
                "status": "success",
                "id": manifest.id,
                "local_copy": local_copy.display().to_string(),
                "warnings": warnings.len(),
            }),
            BackupOutcome::Skipped { reason } => serde_json::json!({
                "event": "complete",
                "command": "backup",
                "status": "skipped",
                "reason": reason,
            }),
        };
        let _ = crate::ui::json::emit(summary);
        return Ok(EXIT_OK);
    }

    match &outcome {
        BackupOutcome::Created {
            manifest,
            local_copy,
            ..
        } => {
            log::success(
                ui,
                &format!(
                    "{} backup {} of {} complete; manifest copied to {}",
                    mode,
                    manifest.id,
                    environment,
                    local_copy.display()
                ),
            );
        }
        BackupOutcome::Skipped { reason } => {
            log::warning(ui, &format!("backup skipped: {}", reason));
        }
    }
    Ok(EXIT_OK)
}
