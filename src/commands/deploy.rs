//! `deploy [environment]`

use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

use campaign_deploy::presentation::factory::create_deploy_use_case;
use campaign_deploy::{BackupChoice, DeployOptions, DeployOutcome, Environment, EXIT_FATAL};

use super::{event_sink, finish, load_config, note_host, parse_environment, project_root, GlobalOptions};
use crate::ui::error::ErrorContext;
use crate::ui::log;

#[derive(Debug, Clone)]
pub struct DeployArgs {
    pub environment: String,
    pub backup: bool,
    pub no_backup: bool,
    pub dry_run: bool,
    pub yes: bool,
}

pub fn cmd_deploy(args: &DeployArgs, global: &GlobalOptions) -> i32 {
    let mut ctx = ErrorContext::new("deploy");
    let result = run(args, global, &mut ctx);
    finish(result, &ctx, &global.ui)
}

fn run(args: &DeployArgs, global: &GlobalOptions, ctx: &mut ErrorContext) -> Result<i32> {
    let ui = &global.ui;
    let environment = parse_environment(&args.environment, ctx)?;
    let root = project_root()?;
    let loaded = load_config(&root, global)?;
    note_host(&loaded, environment, ctx);

    if needs_confirmation(environment, args) && ui.can_prompt() {
        let target = ctx.host.as_deref().unwrap_or("the production host");
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Deploy to production on {}?", target))
            .default(false)
            .interact()?;
        if !confirmed {
            log::warning(ui, "aborted by operator; nothing was changed");
            return Ok(EXIT_FATAL);
        }
    }

    let options = DeployOptions::new(environment)
        .with_backup(BackupChoice::from_flags(args.backup, args.no_backup))
        .with_dry_run(args.dry_run);

    let use_case = create_deploy_use_case(loaded.config, &root, event_sink(ui, "deploy"));
    let outcome = use_case.execute(&options)?;

    if let DeployOutcome::Local {
        command,
        exit_code: Some(code),
    } = &outcome
    {
        if *code != 0 && !ui.json {
            log::warning(ui, &format!("'{}' exited with status {}", command, code));
        }
    }
    Ok(outcome.exit_code())
}

fn needs_confirmation(environment: Environment, args: &DeployArgs) -> bool {
    environment == Environment::Production && !args.yes && !args.dry_run
}
