//! UV luminosity functions.
//!
//! `phi(L, z)` in `Mpc^-3 mag^-1` with `L` an absolute UV magnitude.

use std::f64::consts::LN_10;

use serde::{Deserialize, Serialize};

use crate::error::CosmologyError;

/// Lapi et al. (2017) coefficients, UV only.
///
/// Cubics in `log10(1 + z)` for the log normalisation, the faint-end slope
/// and the log characteristic star-formation rate.
const LAPI17_UV: [f64; 12] = [
    -1.96, -1.60, 4.22, -5.23, // normalisation
    1.11, 2.85, -6.18, 4.44, // slope
    0.01, 2.85, 0.43, -1.70, // characteristic SFR
];

/// Lapi et al. (2017) coefficients, UV plus far-IR.
const LAPI17_UVIR: [f64; 12] = [
    -2.13, -8.90, 18.07, -11.77, // normalisation
    1.12, 3.73, -7.80, 5.15, // slope
    0.72, 8.56, -10.08, 2.54, // characteristic SFR
];

/// Redshift-evolving Schechter fit: `(phi*, d log phi*/dz)`,
/// `(M*, dM*/dz)`, `(alpha, d alpha/dz)` about `z = 6`.
struct SchechterEvolution {
    phi_star: (f64, f64),
    magnitude_star: (f64, f64),
    alpha: (f64, f64),
}

const BOUWENS15: SchechterEvolution = SchechterEvolution {
    phi_star: (0.47, -0.27),
    magnitude_star: (-20.95, 0.01),
    alpha: (-1.87, -0.10),
};

const BOUWENS16: SchechterEvolution = SchechterEvolution {
    phi_star: (0.45, -0.21),
    magnitude_star: (-20.97, 0.17),
    alpha: (-1.91, -0.13),
};

/// A parameterised UV luminosity function.
///
/// # Example
///
/// ```rust
/// use halox_cosmology::LuminosityFunction;
///
/// let lf: LuminosityFunction = "Bouwens16".parse().unwrap();
/// assert!(lf.evaluate(-20.0, 6.0) > 0.0);
/// assert!("Schechter".parse::<LuminosityFunction>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LuminosityFunction {
    /// Bouwens et al. (2015), fitted over `4 <~ z <~ 8`.
    #[default]
    Bouwens15,
    /// Bouwens et al. (2016), fitted over `4 <~ z <~ 10`.
    Bouwens16,
    /// Lapi et al. (2017), UV data only.
    #[serde(rename = "Lapi17_uv")]
    Lapi17Uv,
    /// Lapi et al. (2017), UV plus far-IR data.
    #[serde(rename = "Lapi17_uvir")]
    Lapi17Uvir,
}

impl LuminosityFunction {
    const ACCEPTED: &'static str = "Bouwens15, Bouwens16, Lapi17_uv, Lapi17_uvir";

    /// The parameterisation name accepted by `FromStr`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bouwens15 => "Bouwens15",
            Self::Bouwens16 => "Bouwens16",
            Self::Lapi17Uv => "Lapi17_uv",
            Self::Lapi17Uvir => "Lapi17_uvir",
        }
    }

    /// Returns all parameterisations.
    #[must_use]
    pub fn all() -> &'static [LuminosityFunction] {
        &[
            Self::Bouwens15,
            Self::Bouwens16,
            Self::Lapi17Uv,
            Self::Lapi17Uvir,
        ]
    }

    /// Number density per magnitude at absolute magnitude `magnitude` and
    /// redshift `z`.
    pub fn evaluate(&self, magnitude: f64, z: f64) -> f64 {
        match self {
            Self::Bouwens15 => schechter(&BOUWENS15, magnitude, z),
            Self::Bouwens16 => schechter(&BOUWENS16, magnitude, z),
            Self::Lapi17Uv => lapi17(&LAPI17_UV, magnitude, z),
            Self::Lapi17Uvir => lapi17(&LAPI17_UVIR, magnitude, z),
        }
    }
}

impl std::fmt::Display for LuminosityFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for LuminosityFunction {
    type Err = CosmologyError;

    /// Parses the exact parameterisation name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Bouwens15" => Ok(Self::Bouwens15),
            "Bouwens16" => Ok(Self::Bouwens16),
            "Lapi17_uv" => Ok(Self::Lapi17Uv),
            "Lapi17_uvir" => Ok(Self::Lapi17Uvir),
            other => Err(CosmologyError::InvalidParameterization {
                kind: "luminosity function",
                name: other.to_string(),
                accepted: Self::ACCEPTED,
            }),
        }
    }
}

/// Schechter function in magnitudes with linear evolution about `z = 6`.
fn schechter(fit: &SchechterEvolution, magnitude: f64, z: f64) -> f64 {
    let dz = z - 6.0;
    let phi_star = fit.phi_star.0 * 10f64.powf(fit.phi_star.1 * dz) * 1e-3;
    let magnitude_star = fit.magnitude_star.0 + fit.magnitude_star.1 * dz;
    let alpha = fit.alpha.0 + fit.alpha.1 * dz + 1.0;
    let exponent = -0.4 * (magnitude - magnitude_star);

    phi_star * 0.4 * LN_10 * 10f64.powf(exponent * alpha) * (-(10f64.powf(exponent))).exp()
}

fn cubic(c: &[f64], x: f64) -> f64 {
    c[0] + x * (c[1] + x * (c[2] + x * c[3]))
}

/// Star-formation-rate function of Lapi et al. (2017) mapped to UV
/// magnitudes.
fn lapi17(coefficients: &[f64; 12], magnitude: f64, z: f64) -> f64 {
    let csi = (1.0 + z).log10();
    let norm = cubic(&coefficients[0..4], csi);
    let alpha = cubic(&coefficients[4..8], csi);
    let sfr_star = 10f64.powf(cubic(&coefficients[8..12], csi));

    let sfr = 10f64.powf(-0.4 * (magnitude - 4.83) - 9.8) / sfr_star;
    -0.4 * norm * sfr.powf(1.0 - alpha) * (-sfr).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_names() {
        for lf in LuminosityFunction::all() {
            let parsed: LuminosityFunction = lf.name().parse().unwrap();
            assert_eq!(parsed, *lf);
            assert_eq!(lf.to_string(), lf.name());
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = "bouwens15".parse::<LuminosityFunction>().unwrap_err();
        match err {
            CosmologyError::InvalidParameterization { kind, name, .. } => {
                assert_eq!(kind, "luminosity function");
                assert_eq!(name, "bouwens15");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bouwens15_at_characteristic_magnitude() {
        // At M = M*, phi = phi* 0.4 ln10 / e
        let value = LuminosityFunction::Bouwens15.evaluate(-20.95, 6.0);
        let expected = 0.47e-3 * 0.4 * LN_10 * (-1.0_f64).exp();
        assert_relative_eq!(value, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_bouwens_faint_end_is_steeper_at_high_redshift() {
        let lf = LuminosityFunction::Bouwens16;
        let slope = |z: f64| (lf.evaluate(-17.0, z) / lf.evaluate(-18.0, z)).log10();
        assert!(slope(8.0) > slope(5.0));
    }

    #[test]
    fn test_lapi17_is_positive_on_the_faint_end() {
        for lf in [LuminosityFunction::Lapi17Uv, LuminosityFunction::Lapi17Uvir] {
            let value = lf.evaluate(-20.0, 4.0);
            assert!(value.is_finite());
            assert!(value > 0.0, "{lf}: {value}");
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&LuminosityFunction::Lapi17Uvir).unwrap();
        assert_eq!(json, "\"Lapi17_uvir\"");
    }
}
