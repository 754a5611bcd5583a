//! Tagline CLI - front-end for WD14-style batch image captioning.
//!
//! Tagline assembles and launches the external tagger for a folder of
//! images, then applies always-first tags to the caption files it produced.
//!
//! # Usage
//!
//! ```bash
//! # Caption a folder
//! tagline caption ./imgs
//!
//! # Inspect the command that would run
//! tagline caption ./imgs --dry-run
//!
//! # View configuration
//! tagline config show
//!
//! # List known tagger models
//! tagline models list
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Tagline - front-end for WD14-style batch image captioning.
#[derive(Parser, Debug)]
#[command(name = "tagline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Caption a folder of images with the external tagger
    Caption(cli::caption::CaptionArgs),

    /// List known tagger models
    Models(cli::models::ModelsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),

    /// Check the host environment and release accelerator memory
    Doctor(cli::doctor::DoctorArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match tagline_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `tagline config path`."
            );
            tagline_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Tagline v{}", tagline_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Caption(args) => cli::caption::execute(args),
        Commands::Models(args) => cli::models::execute(args),
        Commands::Config(args) => cli::config::execute(args),
        Commands::Doctor(args) => cli::doctor::execute(args),
    }
}
