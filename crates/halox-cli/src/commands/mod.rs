//! CLI command implementations.

pub mod config;
pub mod correlation;
pub mod cosmology;
pub mod occupation;
pub mod power;

// Re-export submodules for convenience
pub use config::ConfigArgs;
pub use correlation::CorrelationArgs;
pub use cosmology::CosmologyArgs;
pub use occupation::OccupationArgs;
pub use power::PowerArgs;

use clap::ValueEnum;
use halox_math::grid::log_space;
use halox_model::Component;

use crate::error::{CliError, CliResult};

/// Power spectrum term selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ComponentChoice {
    /// One-halo plus two-halo
    #[default]
    Total,
    /// Pairs inside one halo
    #[value(name = "1h")]
    OneHalo,
    /// Central-satellite pairs
    #[value(name = "cs")]
    CentralSatellite,
    /// Satellite-satellite pairs
    #[value(name = "ss")]
    SatelliteSatellite,
    /// Pairs in distinct halos
    #[value(name = "2h")]
    TwoHalo,
    /// Linear theory times the squared galaxy bias
    LargeScale,
}

impl From<ComponentChoice> for Component {
    fn from(choice: ComponentChoice) -> Self {
        match choice {
            ComponentChoice::Total => Component::Total,
            ComponentChoice::OneHalo => Component::OneHalo,
            ComponentChoice::CentralSatellite => Component::CentralSatellite,
            ComponentChoice::SatelliteSatellite => Component::SatelliteSatellite,
            ComponentChoice::TwoHalo => Component::TwoHalo,
            ComponentChoice::LargeScale => Component::LargeScale,
        }
    }
}

/// Selected components, the total when none were given.
pub fn components(choices: &[ComponentChoice]) -> Vec<Component> {
    if choices.is_empty() {
        vec![Component::Total]
    } else {
        choices.iter().map(|&c| c.into()).collect()
    }
}

/// Parses a comma-separated list of numbers.
pub fn parse_values(s: &str) -> CliResult<Vec<f64>> {
    s.split(',')
        .map(|v| {
            let v = v.trim();
            v.parse::<f64>()
                .map_err(|_| CliError::InvalidNumber(v.to_string()))
        })
        .collect()
}

/// `points` log-spaced samples between positive `min < max`.
pub fn sample_range(min: f64, max: f64, points: usize) -> CliResult<Vec<f64>> {
    if !(min > 0.0 && max > min) || points < 2 {
        return Err(CliError::InvalidRange { min, max, points });
    }
    Ok(log_space(points, min, max))
}
