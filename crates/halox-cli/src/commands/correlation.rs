//! Correlation command implementation.
//!
//! Separations are log-spaced between `--min` and `--max`: comoving
//! Mpc/h for the real-space and projected functions, arcseconds for the
//! angular function.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;
use tabled::Tabled;
use tracing::info;

use halox_cosmology::constants::arcsec_to_rad;

use crate::cli::OutputFormat;
use crate::commands::{components, sample_range, ComponentChoice};
use crate::config::RunConfig;
use crate::output::{display_sci, print_section};

/// Arguments for the correlation command.
#[derive(Args, Debug)]
pub struct CorrelationArgs {
    /// Statistic to compute
    #[arg(value_enum, default_value = "real")]
    pub statistic: Statistic,

    /// Spectrum term, repeatable (defaults to the total)
    #[arg(short = 'C', long = "component", value_enum)]
    pub components: Vec<ComponentChoice>,

    /// Smallest separation
    #[arg(long)]
    pub min: Option<f64>,

    /// Largest separation
    #[arg(long)]
    pub max: Option<f64>,

    /// Number of log-spaced separations
    #[arg(short, long, default_value_t = 20)]
    pub points: usize,
}

/// Correlation statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Statistic {
    /// ξ(r) in three dimensions
    #[default]
    Real,
    /// w_p(r_p) projected along the line of sight
    Projected,
    /// w(θ) on the sky
    Angular,
}

impl Statistic {
    fn default_range(self) -> (f64, f64) {
        match self {
            Self::Real | Self::Projected => (0.1, 50.0),
            Self::Angular => (1.0, 1000.0),
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::Real => "Correlation Function ξ(r)",
            Self::Projected => "Projected Correlation w_p(r_p)",
            Self::Angular => "Angular Correlation w(θ)",
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct CorrelationRow {
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "Separation", display_with = "display_sci")]
    separation: f64,
    #[tabled(rename = "Value", display_with = "display_sci")]
    value: f64,
}

/// Execute the correlation command.
pub fn execute(args: CorrelationArgs, config: &RunConfig, format: OutputFormat) -> Result<()> {
    let (default_min, default_max) = args.statistic.default_range();
    let separations = sample_range(
        args.min.unwrap_or(default_min),
        args.max.unwrap_or(default_max),
        args.points,
    )?;

    let model = config.build_halo_model()?;

    let mut rows = Vec::new();
    for component in components(&args.components) {
        let values = match args.statistic {
            Statistic::Real => model.correlation_function(component, &separations)?,
            Statistic::Projected => model.projected_correlation(component, &separations)?,
            Statistic::Angular => {
                let theta: Vec<f64> = separations.iter().map(|&a| arcsec_to_rad(a)).collect();
                model.angular_correlation(component, &theta)?
            }
        };
        info!(%component, statistic = ?args.statistic, "correlation");
        rows.extend(
            separations
                .iter()
                .zip(values)
                .map(|(&separation, value)| CorrelationRow {
                    component: component.to_string(),
                    separation,
                    value,
                }),
        );
    }

    print_section(args.statistic.title(), &rows, format)
}
