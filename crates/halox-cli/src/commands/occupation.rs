//! Occupation command implementation.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::commands::sample_range;
use crate::config::RunConfig;
use crate::output::{display_sci, print_section};

/// Arguments for the occupation command.
#[derive(Args, Debug)]
pub struct OccupationArgs {
    /// Smallest halo mass in M_sun
    #[arg(long, default_value_t = 1e9)]
    pub min: f64,

    /// Largest halo mass in M_sun
    #[arg(long, default_value_t = 1e15)]
    pub max: f64,

    /// Number of log-spaced masses
    #[arg(short, long, default_value_t = 13)]
    pub points: usize,
}

#[derive(Debug, Serialize, Tabled)]
struct OccupationRow {
    #[tabled(rename = "M [M_sun]", display_with = "display_sci")]
    mass: f64,
    #[tabled(rename = "N_cen", display_with = "display_sci")]
    central: f64,
    #[tabled(rename = "N_sat", display_with = "display_sci")]
    satellite: f64,
    #[tabled(rename = "N_gal", display_with = "display_sci")]
    total: f64,
}

/// Execute the occupation command.
pub fn execute(args: OccupationArgs, config: &RunConfig, format: OutputFormat) -> Result<()> {
    let masses = sample_range(args.min, args.max, args.points)?;
    let occupation = config.occupation.build();

    let rows: Vec<OccupationRow> = masses
        .into_iter()
        .map(|m| OccupationRow {
            mass: m,
            central: occupation.mean_central(m),
            satellite: occupation.mean_satellite(m),
            total: occupation.mean_galaxies(m),
        })
        .collect();

    print_section(&format!("Occupation ({})", occupation.name()), &rows, format)
}
