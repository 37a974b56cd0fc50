//! APIM policy sync CLI
//!
//! Applies the API Management policies declared in a repository to a live
//! service and publishes the resulting etag for later workflow steps.

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use config::SyncConfig;
use error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    tracing::debug!("Verbose mode enabled");

    let command = cli.command.clone().unwrap_or(Commands::Sync { strict: false });

    let settings = match resolve_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            if matches!(command, Commands::Sync { .. }) {
                output::publish_etag("", !cli.json)?;
            }
            return Err(e);
        }
    };

    match command {
        Commands::Sync { strict } => commands::run_sync(&settings, strict, cli.json).await,
        Commands::Validate => commands::run_validate(&settings, cli.json),
    }
}

fn resolve_settings(cli: &Cli) -> Result<SyncConfig> {
    let file = match &cli.config {
        Some(path) => SyncConfig::load(path)?,
        None => SyncConfig::default(),
    };
    Ok(file.merge(cli.overrides()))
}
