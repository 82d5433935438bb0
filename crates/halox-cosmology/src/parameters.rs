//! Cosmological parameters and model selections.

use serde::{Deserialize, Serialize};

use crate::error::{CosmologyError, CosmologyResult};

// =============================================================================
// COSMOLOGICAL PARAMETERS
// =============================================================================

/// Density parameters, Hubble parameter, normalisation and dark-energy
/// equation of state.
///
/// Dark energy follows the CPL form `w(z) = w0 + wa z / (1 + z)`. The
/// defaults describe a flat ΛCDM model.
///
/// # Example
///
/// ```rust
/// use halox_cosmology::CosmologicalParameters;
///
/// let params = CosmologicalParameters::default().with_sigma8(0.81).with_h(0.677);
/// assert_eq!(params.omega_m, 0.3);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CosmologicalParameters {
    /// Matter density parameter Ω_M.
    pub omega_m: f64,
    /// Baryon density parameter Ω_b.
    pub omega_b: f64,
    /// Dark-energy density parameter Ω_Λ.
    pub omega_l: f64,
    /// Neutrino density parameter Ω_ν, scales like radiation.
    pub omega_n: f64,
    /// Radiation density parameter Ω_r.
    pub omega_r: f64,
    /// Curvature density parameter Ω_K.
    pub omega_k: f64,
    /// Dimensionless Hubble parameter `H0 / (100 km/s/Mpc)`.
    pub h: f64,
    /// Present-day amplitude σ_8.
    pub sigma8: f64,
    /// Dark-energy equation of state, constant term.
    pub w0: f64,
    /// Dark-energy equation of state, slope in `1 - a`.
    pub wa: f64,
}

impl Default for CosmologicalParameters {
    fn default() -> Self {
        Self {
            omega_m: 0.3,
            omega_b: 0.045,
            omega_l: 0.7,
            omega_n: 0.0,
            omega_r: 0.0,
            omega_k: 0.0,
            h: 0.7,
            sigma8: 0.8,
            w0: -1.0,
            wa: 0.0,
        }
    }
}

impl CosmologicalParameters {
    /// Sets Ω_M.
    #[must_use]
    pub fn with_omega_m(mut self, omega_m: f64) -> Self {
        self.omega_m = omega_m;
        self
    }

    /// Sets Ω_b.
    #[must_use]
    pub fn with_omega_b(mut self, omega_b: f64) -> Self {
        self.omega_b = omega_b;
        self
    }

    /// Sets Ω_Λ.
    #[must_use]
    pub fn with_omega_l(mut self, omega_l: f64) -> Self {
        self.omega_l = omega_l;
        self
    }

    /// Sets Ω_K.
    #[must_use]
    pub fn with_omega_k(mut self, omega_k: f64) -> Self {
        self.omega_k = omega_k;
        self
    }

    /// Sets Ω_r.
    #[must_use]
    pub fn with_omega_r(mut self, omega_r: f64) -> Self {
        self.omega_r = omega_r;
        self
    }

    /// Sets Ω_ν.
    #[must_use]
    pub fn with_omega_n(mut self, omega_n: f64) -> Self {
        self.omega_n = omega_n;
        self
    }

    /// Sets h.
    #[must_use]
    pub fn with_h(mut self, h: f64) -> Self {
        self.h = h;
        self
    }

    /// Sets σ_8.
    #[must_use]
    pub fn with_sigma8(mut self, sigma8: f64) -> Self {
        self.sigma8 = sigma8;
        self
    }

    /// Sets the dark-energy equation of state `(w0, wa)`.
    #[must_use]
    pub fn with_dark_energy(mut self, w0: f64, wa: f64) -> Self {
        self.w0 = w0;
        self.wa = wa;
        self
    }

    /// Checks that the parameters describe a usable model.
    ///
    /// # Errors
    ///
    /// Returns [`CosmologyError::InvalidInput`] for non-finite values, a
    /// non-positive `h`, `sigma8` or Ω_M, or negative Ω_b, Ω_r, Ω_ν.
    pub fn validate(&self) -> CosmologyResult<()> {
        let all = [
            self.omega_m,
            self.omega_b,
            self.omega_l,
            self.omega_n,
            self.omega_r,
            self.omega_k,
            self.h,
            self.sigma8,
            self.w0,
            self.wa,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(CosmologyError::invalid_input(
                "cosmological parameters must be finite",
            ));
        }
        if self.h <= 0.0 || self.sigma8 <= 0.0 || self.omega_m <= 0.0 {
            return Err(CosmologyError::invalid_input(format!(
                "h, sigma8 and omega_m must be positive (h = {}, sigma8 = {}, omega_m = {})",
                self.h, self.sigma8, self.omega_m
            )));
        }
        if self.omega_b < 0.0 || self.omega_r < 0.0 || self.omega_n < 0.0 {
            return Err(CosmologyError::invalid_input(
                "omega_b, omega_r and omega_n must be non-negative",
            ));
        }
        Ok(())
    }

    /// True for the cosmological-constant case `w0 = -1, wa = 0`.
    pub fn is_lambda(&self) -> bool {
        self.w0 == -1.0 && self.wa == 0.0
    }
}

// =============================================================================
// MODEL SELECTIONS
// =============================================================================

/// Halo mass function fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MassFunctionModel {
    /// Sheth & Tormen (2001).
    ShethTormen,
    /// Tinker et al. (2008), Δ = 200.
    Tinker08,
    /// Tinker08 with the high-redshift correction of Behroozi et al. (2013).
    #[default]
    Behroozi13,
}

/// Large-scale halo bias fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HaloBiasModel {
    /// Sheth, Mo & Tormen (2001).
    ShethMoTormen,
    /// Tinker et al. (2010), Δ = 200.
    #[default]
    Tinker10,
}

/// Virial overdensity fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverdensityModel {
    /// Bryan & Norman (1998).
    BryanNorman,
    /// Nakamura & Suto (1997).
    #[default]
    NakamuraSuto,
}

/// Mass–concentration relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationModel {
    /// Shimizu et al. (2003).
    #[default]
    Shimizu03,
    /// Zhao et al. (2009), from the formation time of 4% of the mass.
    Zhao09,
}

/// Runtime selection of the halo fits, plus the formation-redshift fallback.
///
/// # Example
///
/// ```rust
/// use halox_cosmology::{CosmologyOptions, MassFunctionModel};
///
/// let options = CosmologyOptions::default().with_mass_function(MassFunctionModel::Tinker08);
/// assert!(options.formation_fallback.is_nan());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CosmologyOptions {
    /// Halo mass function.
    pub mass_function: MassFunctionModel,
    /// Halo bias.
    pub halo_bias: HaloBiasModel,
    /// Virial overdensity.
    pub overdensity: OverdensityModel,
    /// Mass–concentration relation.
    pub concentration: ConcentrationModel,
    /// Value returned by the formation-redshift solve when it fails.
    ///
    /// Not a redshift. Defaults to NaN so failures propagate visibly.
    pub formation_fallback: f64,
}

impl Default for CosmologyOptions {
    fn default() -> Self {
        Self {
            mass_function: MassFunctionModel::default(),
            halo_bias: HaloBiasModel::default(),
            overdensity: OverdensityModel::default(),
            concentration: ConcentrationModel::default(),
            formation_fallback: f64::NAN,
        }
    }
}

impl CosmologyOptions {
    /// Sets the mass function.
    #[must_use]
    pub fn with_mass_function(mut self, model: MassFunctionModel) -> Self {
        self.mass_function = model;
        self
    }

    /// Sets the halo bias.
    #[must_use]
    pub fn with_halo_bias(mut self, model: HaloBiasModel) -> Self {
        self.halo_bias = model;
        self
    }

    /// Sets the virial overdensity.
    #[must_use]
    pub fn with_overdensity(mut self, model: OverdensityModel) -> Self {
        self.overdensity = model;
        self
    }

    /// Sets the concentration relation.
    #[must_use]
    pub fn with_concentration(mut self, model: ConcentrationModel) -> Self {
        self.concentration = model;
        self
    }

    /// Sets the formation-redshift fallback.
    #[must_use]
    pub fn with_formation_fallback(mut self, value: f64) -> Self {
        self.formation_fallback = value;
        self
    }
}
