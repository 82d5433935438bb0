//! Power command implementation.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::info;

use crate::cli::OutputFormat;
use crate::commands::{components, ComponentChoice};
use crate::config::RunConfig;
use crate::output::{display_sci, print_section, KeyValue};

/// Arguments for the power command.
#[derive(Args, Debug)]
pub struct PowerArgs {
    /// Spectrum term, repeatable (defaults to the total)
    #[arg(short = 'C', long = "component", value_enum)]
    pub components: Vec<ComponentChoice>,

    /// Also print the population statistics
    #[arg(short, long)]
    pub stats: bool,
}

#[derive(Debug, Serialize, Tabled)]
struct PowerRow {
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "k [h/Mpc]", display_with = "display_sci")]
    k: f64,
    #[tabled(rename = "P(k) [(Mpc/h)^3]", display_with = "display_sci")]
    power: f64,
}

/// Execute the power command.
pub fn execute(args: PowerArgs, config: &RunConfig, format: OutputFormat) -> Result<()> {
    let model = config.build_halo_model()?;

    let mut rows = Vec::new();
    for component in components(&args.components) {
        let spectrum = model.power_spectrum(component)?;
        info!(%component, bins = spectrum.len(), "power spectrum");
        rows.extend(
            model
                .wavenumbers()
                .iter()
                .zip(spectrum)
                .map(|(&k, power)| PowerRow {
                    component: component.to_string(),
                    k,
                    power,
                }),
        );
    }

    if args.stats {
        let stats = vec![
            KeyValue::from_f64("Mean galaxy density", model.mean_galaxy_density()?),
            KeyValue::from_f64("Galaxy bias", model.bias()?),
            KeyValue::from_f64("Mean halo mass", model.mean_halo_mass()?),
        ];
        print_section("Population", &stats, format)?;
    }

    print_section(&format!("Power Spectrum at z = {}", model.redshift()), &rows, format)
}
