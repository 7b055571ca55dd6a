//! speech-fx CLI
//!
//! Command-line interface for the speech post-processing pipeline.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use speech_fx::cli::commands;
use speech_fx::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    // RUST_LOG wins, then --verbose, then the configured filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(&config.log_filter)
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("speech-fx v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Speak {
            text,
            output,
            effects,
        } => {
            commands::speak(&config, &text, &output, &effects)?;
        }
        Commands::Process {
            input,
            output,
            effects,
        } => {
            commands::process(&config, &input, output.as_deref(), &effects)?;
        }
        Commands::Chain { effects } => {
            println!("{}", commands::chain_json(&config, &effects)?);
        }
    }
    Ok(())
}
