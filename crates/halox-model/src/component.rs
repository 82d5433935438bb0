//! Terms of the galaxy power spectrum.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A term of the halo-model decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    /// One-halo plus two-halo.
    #[default]
    Total,
    /// Pairs within one halo.
    OneHalo,
    /// Central-satellite pairs within one halo.
    CentralSatellite,
    /// Satellite-satellite pairs within one halo.
    SatelliteSatellite,
    /// Pairs in distinct halos.
    TwoHalo,
    /// Linear theory scaled by the squared galaxy bias.
    LargeScale,
}

impl Component {
    /// Short name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::OneHalo => "1h",
            Self::CentralSatellite => "cs",
            Self::SatelliteSatellite => "ss",
            Self::TwoHalo => "2h",
            Self::LargeScale => "large_scale",
        }
    }

    /// Returns all components.
    #[must_use]
    pub fn all() -> &'static [Component] {
        &[
            Self::Total,
            Self::OneHalo,
            Self::CentralSatellite,
            Self::SatelliteSatellite,
            Self::TwoHalo,
            Self::LargeScale,
        ]
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Component {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "total" => Ok(Self::Total),
            "1h" | "one_halo" | "1halo" => Ok(Self::OneHalo),
            "cs" | "central_satellite" => Ok(Self::CentralSatellite),
            "ss" | "satellite_satellite" => Ok(Self::SatelliteSatellite),
            "2h" | "two_halo" | "2halo" => Ok(Self::TwoHalo),
            "large_scale" | "ls" => Ok(Self::LargeScale),
            _ => Err(ModelError::invalid_parameterization("component", s)),
        }
    }
}
