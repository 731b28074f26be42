//! Photoreport CLI - turn a folder of photographs into a slide deck report.
//!
//! Photographs are validated, checked for blur, laid out on slides built
//! from a template and moved to a processed folder once placed.
//!
//! # Usage
//!
//! ```bash
//! # Generate a report from the configured source folder
//! photoreport generate
//!
//! # Use another source folder for this run
//! photoreport generate --source ./fotos
//!
//! # Write a starter configuration
//! photoreport config init
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use photoreport_core::config::LoggingConfig;
use photoreport_core::ReportConfig;

mod cli;
mod logging;

/// Photoreport - build photo report slide decks from a folder of images.
#[derive(Parser, Debug)]
#[command(name = "photoreport")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Configuration file (defaults to ./config.toml, then the user config dir)
    #[arg(short, long, global = true, env = "PHOTOREPORT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a report from the source folder
    Generate(cli::generate::GenerateArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = ReportConfig::load_or_locate(cli.config.as_deref());
    let (logging_config, log_file) = match &config {
        Ok(config) => (config.logging.clone(), config.log_file()),
        Err(e) => {
            if matches!(cli.command, Commands::Generate(_)) {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Check your config file with `photoreport config path`."
                );
            }
            (LoggingConfig::default(), None)
        }
    };
    logging::init_from_config(
        &logging_config,
        log_file.as_deref(),
        cli.verbose,
        cli.json_logs,
    )?;

    tracing::debug!("Photoreport v{}", photoreport_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Generate(args) => cli::generate::execute(args, config?).await,
        Commands::Config(args) => cli::config::execute(args, cli.config, config).await,
    }
}
