//! Railtrail - train reservation drafts with session trail logging
//!
#![doc = "Railtrail - train reservation drafts with session trail logging"]
#![doc = "Main entry point for the railtrail command."]

use anyhow::Result;

use railtrail::cli::{Cli, Commands};
use railtrail::commands;
use railtrail::config::Config;
use railtrail::logging::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate before the log filter is built from it
    config.validate()?;

    init_logging(&config.logging)?;

    match cli.command {
        Commands::Session { command } => {
            tracing::debug!(?command, "Running session command");
            commands::session::handle_session(&config, command)
        }
        Commands::Draft { command } => {
            tracing::debug!(?command, "Running draft command");
            commands::draft::handle_draft(&config, command)
        }
        Commands::Stations => commands::draft::handle_stations(),
    }
}
