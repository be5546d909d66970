// Main entry point - Configuration and dependency injection
mod application;
mod domain;
mod infrastructure;
mod presentation;

use clap::Parser;
use std::sync::Arc;

use crate::infrastructure::config::{Settings, load_env_settings};
use crate::infrastructure::grafana_client::GrafanaClient;
use crate::infrastructure::logging::init_logging;
use crate::presentation::cli::Cli;
use crate::presentation::commands;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::new(
        cli.command.api_url().to_string(),
        load_env_settings()?,
        cli.verbose,
    )?;

    init_logging(settings.verbose);
    tracing::debug!("Using Grafana API at {}", settings.api_url);

    // Create client (infrastructure layer)
    let repository = Arc::new(GrafanaClient::new(&settings)?);

    // Run the command (application layer)
    commands::run(cli.command, repository).await
}
