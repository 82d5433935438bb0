//! Config command implementation.
//!
//! Prints run configurations as TOML, or as JSON with `--format json`.

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::OutputFormat;
use crate::config::{user_config_path, RunConfig};
use crate::output::{print_info, print_output, print_warning, KeyValue};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the configuration in effect
    Show,

    /// Print the default configuration
    Default,

    /// Show configuration file locations
    Path,
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, config: &RunConfig, explicit: Option<&Path>, format: OutputFormat) -> Result<()> {
    match args.command {
        ConfigCommand::Show => print_config(config, format),
        ConfigCommand::Default => print_config(&RunConfig::default(), format),
        ConfigCommand::Path => execute_path(explicit, format),
    }
}

fn print_config(config: &RunConfig, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
        OutputFormat::Table | OutputFormat::Csv | OutputFormat::Minimal => print!("{}", config.to_toml()?),
    }
    Ok(())
}

fn execute_path(explicit: Option<&Path>, format: OutputFormat) -> Result<()> {
    let user = user_config_path();
    if user.is_none() {
        print_warning("No configuration directory on this platform");
    }

    let in_use = match (explicit, &user) {
        (Some(path), _) => path.display().to_string(),
        (None, Some(path)) if path.is_file() => path.display().to_string(),
        _ => "defaults".to_string(),
    };
    let rows = vec![
        KeyValue::new(
            "User config",
            user.as_ref().map_or_else(|| "-".to_string(), |p| p.display().to_string()),
        ),
        KeyValue::new("In use", in_use),
    ];

    if format == OutputFormat::Table {
        print_info("Pass --config <file> or set HALOX_CONFIG to override");
    }
    print_output(&rows, format)
}
