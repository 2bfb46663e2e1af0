//! Command executor for dispatching CLI commands

use super::handlers::ServeCommandHandler;
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::AppResult;

/// Execute a CLI command with the given settings.
///
/// No subcommand behaves like `serve`.
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    warn_on_privileged_bind(&settings);

    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings).execute(*dry_run).await
        }
        None => ServeCommandHandler::new(settings).execute(false).await,
    }
}

fn warn_on_privileged_bind(settings: &Settings) {
    if settings.server.port < 1024 && settings.server.host == "0.0.0.0" {
        tracing::warn!(
            port = settings.server.port,
            "Binding to 0.0.0.0 on a privileged port typically requires root privileges"
        );
    }
}
