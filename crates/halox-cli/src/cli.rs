//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::commands::{ConfigArgs, CorrelationArgs, CosmologyArgs, OccupationArgs, PowerArgs};

/// Halox - halo-model galaxy clustering and cosmology toolkit.
#[derive(Parser, Debug)]
#[command(name = "halox")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Run configuration (TOML)
    #[arg(short, long, global = true, env = "HALOX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Only report errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More log output (repeat for more)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Background cosmology at a set of redshifts
    Cosmology(CosmologyArgs),

    /// Halo-model power spectrum terms on the wavenumber grid
    Power(PowerArgs),

    /// Real-space, projected or angular correlation functions
    Correlation(CorrelationArgs),

    /// Mean central and satellite counts on a mass grid
    Occupation(OccupationArgs),

    /// Show the run configuration
    Config(ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Pretty table output
    #[default]
    Table,
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Minimal output (just values)
    Minimal,
}
