//! Flightrag CLI
//!
//! Graph-RAG question answering over airline passenger survey data.

use anyhow::Result;
use clap::Parser;
use flightrag_core::error::exit_codes;
use flightrag_core::FlightRagError;
use tracing_subscriber::EnvFilter;

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<FlightRagError>()
            .map(FlightRagError::exit_code)
            .unwrap_or(exit_codes::GENERAL_ERROR);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Ask(args) => commands::ask::run(args, config_path, cli.format).await,
        Commands::Intent(args) => commands::intent::run(args, cli.format),
        Commands::Entities(args) => commands::entities::run(args, cli.format),
        Commands::Models => commands::models::run(config_path, cli.format),
        Commands::Check => commands::check::run(config_path, cli.format).await,
        Commands::Config(args) => commands::config::run(args, config_path, cli.format),
    }
}
