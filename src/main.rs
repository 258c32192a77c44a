//! campaign-deploy CLI
//!
//! Usage: campaign-deploy <COMMAND>
//!
//! Commands:
//!   deploy  Deploy the application to an environment (default: homolog)
//!   backup  Back up a deployed environment (full or data-only)
//!   plan    Show what a deploy would transfer, without connecting

mod commands;
mod ui;

use clap::Parser;

use campaign_deploy::presentation::{Cli, Commands};

use crate::commands::deploy::DeployArgs;
use crate::commands::GlobalOptions;
use crate::ui::context::UiContext;

/// Exit status after SIGINT
const EXIT_INTERRUPTED: i32 = 130;

fn main() {
    let cli = Cli::parse();
    let ui = UiContext::new(cli.json, cli.verbose, cli.color);

    let _ = ctrlc::set_handler(move || {
        if ui.json {
            let _ = ui::json::emit(serde_json::json!({
                "event": "interrupted",
            }));
        } else {
            ui::log::warning(
                &ui,
                "interrupted; the remote host may be partially updated and its deploy lock left in place",
            );
        }
        std::process::exit(EXIT_INTERRUPTED);
    });

    let global = GlobalOptions {
        ui,
        config: cli.config,
    };

    let code = match cli.command {
        Commands::Deploy {
            environment,
            backup,
            no_backup,
            dry_run,
            yes,
        } => commands::deploy::cmd_deploy(
            &DeployArgs {
                environment,
                backup,
                no_backup,
                dry_run,
                yes,
            },
            &global,
        ),
        Commands::Backup { environment, mode } => {
            commands::backup::cmd_backup(&environment, mode.into(), &global)
        }
        Commands::Plan { environment } => commands::plan::cmd_plan(&environment, &global),
    };

    std::process::exit(code);
}
