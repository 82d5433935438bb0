//! Halox CLI - halo-model galaxy clustering from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Background quantities
//! halox cosmology --redshifts 0.5,1,2
//!
//! # Power spectrum terms of the configured galaxy population
//! halox --config run.toml power --component total --component 1h
//!
//! # Angular correlation between 1 and 1000 arcsec
//! halox correlation angular --min 1 --max 1000 --points 20
//!
//! # Write the default configuration
//! halox config default > run.toml
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod error;
mod output;

use cli::{Cli, Commands};
use config::RunConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let format = cli.format;
    let config = RunConfig::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Cosmology(args) => commands::cosmology::execute(args, &config, format)?,
        Commands::Power(args) => commands::power::execute(args, &config, format)?,
        Commands::Correlation(args) => commands::correlation::execute(args, &config, format)?,
        Commands::Occupation(args) => commands::occupation::execute(args, &config, format)?,
        Commands::Config(args) => commands::config::execute(args, &config, cli.config.as_deref(), format)?,
    }

    Ok(())
}

/// Installs the stderr subscriber. `RUST_LOG` wins over the flags.
///
/// Library crates log through `log`; the subscriber picks those records up
/// through its `tracing-log` bridge.
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
