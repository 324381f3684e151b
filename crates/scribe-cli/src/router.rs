//! Command routing logic for CLI

use crate::args::{Cli, Commands};
use crate::commands;
use scribe_core::StateLocations;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> anyhow::Result<()> {
    let locations = StateLocations::resolve(cli.state_dir.clone())?;
    tracing::debug!("Using state directory {:?}", locations.state_dir());

    match cli.command {
        Some(Commands::Edit {
            files,
            recover,
            recover_latest,
        }) => {
            commands::edit_execute(
                &locations,
                commands::EditArgs {
                    files,
                    recover,
                    recover_latest,
                    verbose: cli.verbose,
                },
            )
            .await
        }
        Some(Commands::Snapshots { action }) => {
            commands::snapshots::execute(&locations, action).await
        }
        Some(Commands::Recent { clear }) => commands::recent::execute(&locations, clear),
        Some(Commands::Config { action }) => commands::config::execute(&locations, action),

        // No subcommand: edit session on an empty document
        None => {
            commands::edit_execute(
                &locations,
                commands::EditArgs {
                    verbose: cli.verbose,
                    ..Default::default()
                },
            )
            .await
        }
    }
}
