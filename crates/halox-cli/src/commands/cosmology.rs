//! Cosmology command implementation.
//!
//! Tabulates background and halo quantities of the configured cosmology.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use halox_cosmology::Cosmology;

use crate::cli::OutputFormat;
use crate::commands::{parse_values, sample_range};
use crate::config::RunConfig;
use crate::error::{CliError, CliResult};
use crate::output::{display_sci, print_section};

/// Arguments for the cosmology command.
#[derive(Args, Debug)]
pub struct CosmologyArgs {
    #[command(subcommand)]
    pub command: CosmologyCommand,
}

/// Cosmology subcommands.
#[derive(Subcommand, Debug)]
pub enum CosmologyCommand {
    /// Expansion, distances, growth and thresholds at given redshifts
    Background(BackgroundArgs),

    /// Mass function, bias and concentration on a mass grid
    Halos(HalosArgs),
}

/// Arguments for the background subcommand.
#[derive(Args, Debug)]
pub struct BackgroundArgs {
    /// Comma-separated redshifts
    #[arg(short, long, default_value = "0,0.5,1,2,5")]
    pub redshifts: String,
}

/// Arguments for the halos subcommand.
#[derive(Args, Debug)]
pub struct HalosArgs {
    /// Redshift (defaults to the pipeline redshift)
    #[arg(short, long)]
    pub redshift: Option<f64>,

    /// Smallest halo mass in M_sun
    #[arg(long, default_value_t = 1e10)]
    pub min: f64,

    /// Largest halo mass in M_sun
    #[arg(long, default_value_t = 1e15)]
    pub max: f64,

    /// Number of log-spaced masses
    #[arg(short, long, default_value_t = 11)]
    pub points: usize,
}

#[derive(Debug, Serialize, Tabled)]
struct BackgroundRow {
    #[tabled(rename = "z")]
    z: f64,
    #[tabled(rename = "E(z)", display_with = "display_sci")]
    e: f64,
    #[tabled(rename = "D_C [Mpc]", display_with = "display_sci")]
    comoving_distance: f64,
    #[tabled(rename = "D_A [Mpc]", display_with = "display_sci")]
    angular_diameter_distance: f64,
    #[tabled(rename = "t [Gyr]", display_with = "display_sci")]
    cosmic_time: f64,
    #[tabled(rename = "D(z)", display_with = "display_sci")]
    growth_factor: f64,
    #[tabled(rename = "Ω_M(z)", display_with = "display_sci")]
    omega_m: f64,
    #[tabled(rename = "δ_c", display_with = "display_sci")]
    delta_c: f64,
    #[tabled(rename = "Δ_vir", display_with = "display_sci")]
    virial_overdensity: f64,
}

#[derive(Debug, Serialize, Tabled)]
struct HaloRow {
    #[tabled(rename = "M [M_sun]", display_with = "display_sci")]
    mass: f64,
    #[tabled(rename = "σ(M)", display_with = "display_sci")]
    sigma: f64,
    #[tabled(rename = "dn/dM", display_with = "display_sci")]
    mass_function: f64,
    #[tabled(rename = "b(M)", display_with = "display_sci")]
    bias: f64,
    #[tabled(rename = "c(M)", display_with = "display_sci")]
    concentration: f64,
}

/// Execute the cosmology command.
pub fn execute(args: CosmologyArgs, config: &RunConfig, format: OutputFormat) -> Result<()> {
    match args.command {
        CosmologyCommand::Background(background_args) => execute_background(background_args, config, format),
        CosmologyCommand::Halos(halos_args) => execute_halos(halos_args, config, format),
    }
}

/// Execute the background subcommand.
fn execute_background(args: BackgroundArgs, config: &RunConfig, format: OutputFormat) -> Result<()> {
    let redshifts = parse_values(&args.redshifts)?;
    let cosmology = config.build_cosmology()?;

    let rows = redshifts
        .into_iter()
        .map(|z| {
            let at = tabulated_redshift(&cosmology, z)?;
            Ok(BackgroundRow {
                z,
                e: cosmology.e(at),
                comoving_distance: cosmology.comoving_distance(at),
                angular_diameter_distance: cosmology.angular_diameter_distance(at),
                cosmic_time: cosmology.cosmic_time(at),
                growth_factor: cosmology.growth_factor(at),
                omega_m: cosmology.omega_m(at),
                delta_c: cosmology.delta_c(at),
                virial_overdensity: cosmology.virial_overdensity(at),
            })
        })
        .collect::<CliResult<Vec<_>>>()?;

    print_section("Background Cosmology", &rows, format)
}

/// Execute the halos subcommand.
fn execute_halos(args: HalosArgs, config: &RunConfig, format: OutputFormat) -> Result<()> {
    let masses = sample_range(args.min, args.max, args.points)?;
    let cosmology = config.build_cosmology()?;
    let z = tabulated_redshift(&cosmology, args.redshift.unwrap_or(config.pipeline.redshift))?;

    let rows: Vec<HaloRow> = masses
        .into_iter()
        .map(|m| HaloRow {
            mass: m,
            sigma: cosmology.sigma2_mass(m, z).sqrt(),
            mass_function: cosmology.mass_function(m, z),
            bias: cosmology.halo_bias(m, z),
            concentration: cosmology.concentration(m, z),
        })
        .collect();

    print_section(&format!("Halo Statistics at z = {z}"), &rows, format)
}

/// Maps a non-negative `z` into the tabulated range. Redshifts below the
/// table floor are evaluated at the floor.
fn tabulated_redshift(cosmology: &Cosmology, z: f64) -> CliResult<f64> {
    if !(0.0..=cosmology.z_max()).contains(&z) {
        return Err(CliError::RedshiftOutOfRange {
            z,
            min: cosmology.z_min(),
            max: cosmology.z_max(),
        });
    }
    Ok(z.max(cosmology.z_min()))
}
