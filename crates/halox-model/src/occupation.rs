//! Halo occupation distributions.
//!
//! An occupation model gives the mean number of central and satellite
//! galaxies hosted by a halo of mass `M` (in `M_sun`). Counts are clipped to
//! zero where a fit turns negative or undefined.

use std::fmt::Debug;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Mean galaxy counts per halo.
pub trait OccupationModel: Debug + Send + Sync {
    /// Model name.
    fn name(&self) -> &'static str;

    /// Mean number of central galaxies `<N_cen>(M)`.
    fn mean_central(&self, mass: f64) -> f64;

    /// Mean number of satellite galaxies `<N_sat>(M)`.
    fn mean_satellite(&self, mass: f64) -> f64;

    /// Mean number of galaxies `<N_cen> + <N_sat>`.
    fn mean_galaxies(&self, mass: f64) -> f64 {
        self.mean_central(mass) + self.mean_satellite(mass)
    }
}

/// Smoothed step `(1 + erf((log10 M - log10 M_min) / sigma)) / 2`.
pub fn threshold_probability(mass: f64, threshold: f64, sigma_log: f64) -> f64 {
    let x = (mass.log10() - threshold.log10()) / sigma_log;
    0.5 * (1.0 + libm::erf(x))
}

/// Zero for negative or NaN counts.
fn clip(count: f64) -> f64 {
    if count < 0.0 || count.is_nan() {
        0.0
    } else {
        count
    }
}

// =============================================================================
// HARIKANE ET AL. (2016)
// =============================================================================

/// Harikane et al. (2016) occupation.
///
/// `N_cen = P(M; M_min, σ)`, `N_sat = N_cen ((M - M_0) / M_1)^α`.
///
/// # Example
///
/// ```rust
/// use halox_model::occupation::{Harikane16, OccupationModel};
///
/// let hod = Harikane16::new(0.5, 1e11, 1.0, 1e11, 1e11, 1.0);
/// assert_eq!(hod.mean_satellite(5e10), 0.0);
/// assert!(hod.mean_central(1e13) > 0.99);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Harikane16 {
    /// Duty cycle. Carried with the fit, not applied to the counts.
    pub duty_cycle: f64,
    /// Threshold mass `M_min`.
    pub m_min: f64,
    /// Width of the threshold in `log10 M`.
    pub sigma_log_m: f64,
    /// Satellite cut-off mass `M_0`.
    pub m0: f64,
    /// Satellite normalisation mass `M_1`.
    pub m1: f64,
    /// Satellite slope.
    pub alpha: f64,
}

impl Harikane16 {
    /// Number of scalar parameters.
    pub const PARAMETER_COUNT: usize = 6;

    /// Creates the model.
    pub fn new(duty_cycle: f64, m_min: f64, sigma_log_m: f64, m0: f64, m1: f64, alpha: f64) -> Self {
        Self {
            duty_cycle,
            m_min,
            sigma_log_m,
            m0,
            m1,
            alpha,
        }
    }
}

impl OccupationModel for Harikane16 {
    fn name(&self) -> &'static str {
        "harikane16"
    }

    fn mean_central(&self, mass: f64) -> f64 {
        clip(threshold_probability(mass, self.m_min, self.sigma_log_m))
    }

    fn mean_satellite(&self, mass: f64) -> f64 {
        let central = self.mean_central(mass);
        clip(central * ((mass - self.m0) / self.m1).powf(self.alpha))
    }
}

// =============================================================================
// TINKER ET AL. (2010)
// =============================================================================

/// Tinker et al. (2010) occupation.
///
/// `N_cen = P(M; A_min, σ)`, `N_sat = P(M; 2 A_min, σ) (M / A_sat)^α_sat`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tinker10 {
    /// Threshold mass `A_min`.
    pub a_min: f64,
    /// Width of the threshold in `log10 M`.
    pub sigma_log_a: f64,
    /// Satellite normalisation mass.
    pub a_sat: f64,
    /// Satellite slope.
    pub alpha_sat: f64,
}

impl Tinker10 {
    /// Number of scalar parameters.
    pub const PARAMETER_COUNT: usize = 4;

    /// Creates the model.
    pub fn new(a_min: f64, sigma_log_a: f64, a_sat: f64, alpha_sat: f64) -> Self {
        Self {
            a_min,
            sigma_log_a,
            a_sat,
            alpha_sat,
        }
    }
}

impl OccupationModel for Tinker10 {
    fn name(&self) -> &'static str {
        "tinker10"
    }

    fn mean_central(&self, mass: f64) -> f64 {
        clip(threshold_probability(mass, self.a_min, self.sigma_log_a))
    }

    fn mean_satellite(&self, mass: f64) -> f64 {
        let onset = threshold_probability(mass, 2.0 * self.a_min, self.sigma_log_a);
        clip(onset * (mass / self.a_sat).powf(self.alpha_sat))
    }
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Occupation model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupationKind {
    /// [`Harikane16`].
    Harikane16,
    /// [`Tinker10`].
    Tinker10,
}

impl OccupationKind {
    /// Names of the scalar parameters, in constructor order.
    #[must_use]
    pub fn parameter_names(&self) -> &'static [&'static str] {
        match self {
            Self::Harikane16 => &["duty_cycle", "m_min", "sigma_log_m", "m0", "m1", "alpha"],
            Self::Tinker10 => &["a_min", "sigma_log_a", "a_sat", "alpha_sat"],
        }
    }

    /// Lowercase model name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Harikane16 => "harikane16",
            Self::Tinker10 => "tinker10",
        }
    }
}

impl std::fmt::Display for OccupationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for OccupationKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "harikane16" => Ok(Self::Harikane16),
            "tinker10" => Ok(Self::Tinker10),
            _ => Err(ModelError::invalid_parameterization("occupation", s)),
        }
    }
}

/// Serializable occupation model selection.
///
/// # Example
///
/// ```rust
/// use halox_model::occupation::OccupationParameters;
///
/// let params: OccupationParameters = serde_json::from_str(
///     r#"{"model": "tinker10", "a_min": 1e11, "sigma_log_a": 0.5, "a_sat": 1e12, "alpha_sat": 1.0}"#,
/// ).unwrap();
/// let model = params.build();
/// assert_eq!(model.name(), "tinker10");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum OccupationParameters {
    /// [`Harikane16`] parameters.
    Harikane16(Harikane16),
    /// [`Tinker10`] parameters.
    Tinker10(Tinker10),
}

impl Default for OccupationParameters {
    fn default() -> Self {
        Self::Harikane16(Harikane16::new(0.5, 1e11, 1.0, 1e11, 1e11, 1.0))
    }
}

impl OccupationParameters {
    /// Builds parameters from a flat value list in constructor order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ParameterCount`] when `values` has the wrong
    /// length.
    pub fn from_values(kind: OccupationKind, values: &[f64]) -> ModelResult<Self> {
        let expected = kind.parameter_names().len();
        if values.len() != expected {
            return Err(ModelError::ParameterCount {
                model: kind.name(),
                expected,
                actual: values.len(),
            });
        }
        Ok(match kind {
            OccupationKind::Harikane16 => Self::Harikane16(Harikane16::new(
                values[0], values[1], values[2], values[3], values[4], values[5],
            )),
            OccupationKind::Tinker10 => {
                Self::Tinker10(Tinker10::new(values[0], values[1], values[2], values[3]))
            }
        })
    }

    /// Model family.
    #[must_use]
    pub fn kind(&self) -> OccupationKind {
        match self {
            Self::Harikane16(_) => OccupationKind::Harikane16,
            Self::Tinker10(_) => OccupationKind::Tinker10,
        }
    }

    /// Shared handle to the model.
    #[must_use]
    pub fn build(&self) -> Arc<dyn OccupationModel> {
        match *self {
            Self::Harikane16(model) => Arc::new(model),
            Self::Tinker10(model) => Arc::new(model),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_threshold_probability_is_double_precision() {
        // One sigma above threshold: (1 + erf(1)) / 2
        let p = threshold_probability(1e12, 1e11, 1.0);
        assert_relative_eq!(p, 0.5 * (1.0 + 0.8427007929497149), max_relative = 1e-15);
        assert_eq!(threshold_probability(1e11, 1e11, 0.7), 0.5);
    }

    #[test]
    fn test_harikane16_reference_values() {
        let hod = Harikane16::new(0.5, 1e11, 1.0, 1e11, 1e11, 1.0);
        assert_relative_eq!(hod.mean_central(1e12), 0.9213503964748575, max_relative = 1e-14);
        assert_relative_eq!(hod.mean_satellite(1e12), 8.2921535682737169, max_relative = 1e-14);
        assert_relative_eq!(
            hod.mean_galaxies(1e12),
            0.9213503964748575 + 8.2921535682737169,
            max_relative = 1e-14
        );
    }

    #[test]
    fn test_tinker10_shape() {
        let hod = Tinker10::new(1e11, 1.0, 1e11, 1.0);
        assert_relative_eq!(hod.mean_central(1e11), 0.5, max_relative = 1e-15);
        // Satellites switch on at twice the central threshold
        assert_relative_eq!(
            hod.mean_satellite(2e11),
            0.5 * 2.0,
            max_relative = 1e-14
        );
    }

    #[test]
    fn test_negative_counts_are_clipped() {
        let hod = Harikane16::new(0.5, 1e11, 1.0, 1e11, 1e11, 0.5);
        // (M - M0)^0.5 is NaN below M0
        assert_eq!(hod.mean_satellite(1e10), 0.0);
        let hod = Harikane16::new(0.5, 1e11, 1.0, 1e11, 1e11, 1.0);
        assert_eq!(hod.mean_satellite(1e10), 0.0);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Harikane16".parse::<OccupationKind>().unwrap(), OccupationKind::Harikane16);
        assert_eq!("tinker10".parse::<OccupationKind>().unwrap(), OccupationKind::Tinker10);
        assert!(matches!(
            "zheng07".parse::<OccupationKind>(),
            Err(ModelError::InvalidParameterization { kind: "occupation", .. })
        ));
    }

    #[test]
    fn test_from_values() {
        let params =
            OccupationParameters::from_values(OccupationKind::Tinker10, &[1e11, 0.5, 1e12, 1.1])
                .unwrap();
        assert_eq!(params.kind(), OccupationKind::Tinker10);
        assert!(matches!(
            OccupationParameters::from_values(OccupationKind::Harikane16, &[1.0]),
            Err(ModelError::ParameterCount { expected: 6, actual: 1, .. })
        ));
    }

    #[test]
    fn test_tagged_serialization() {
        let params = OccupationParameters::default();
        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains("\"model\":\"harikane16\""));
        let back: OccupationParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);

        let toml_text = "model = \"tinker10\"\na_min = 1e11\nsigma_log_a = 0.5\na_sat = 1e12\nalpha_sat = 1.0\n";
        let parsed: OccupationParameters = toml::from_str(toml_text).unwrap();
        assert_eq!(parsed.kind(), OccupationKind::Tinker10);

        assert!(serde_json::from_str::<OccupationParameters>(r#"{"model": "zheng07"}"#).is_err());
    }

    proptest! {
        #[test]
        fn prop_central_is_a_probability(log_m in 5.0f64..17.0, sigma in 0.05f64..2.0) {
            let hod = Tinker10::new(1e12, sigma, 1e13, 1.0);
            let n = hod.mean_central(10f64.powf(log_m));
            prop_assert!((0.0..=1.0).contains(&n));
        }

        #[test]
        fn prop_counts_never_negative(log_m in 5.0f64..17.0, alpha in 0.1f64..2.0) {
            let hod = Harikane16::new(1.0, 1e11, 0.8, 1e11, 1e12, alpha);
            let m = 10f64.powf(log_m);
            prop_assert!(hod.mean_satellite(m) >= 0.0);
            prop_assert!(hod.mean_galaxies(m) >= hod.mean_central(m));
        }
    }
}
