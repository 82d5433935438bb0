//! Halo statistics: mass functions, bias, concentration, density profile
//! and formation redshift.
//!
//! Masses are in `M_sun`, wavenumbers in `1/Mpc`. Redshifts must lie in the
//! tabulated range of the model.

use std::f64::consts::PI;

use log::{debug, warn};

use halox_math::solvers::{find_root, SolverConfig};
use halox_math::special::sine_cosine_integrals;

use crate::background::Cosmology;
use crate::error::CosmologyResult;
use crate::parameters::{ConcentrationModel, HaloBiasModel, MassFunctionModel};

// =============================================================================
// FIT CONSTANTS
// =============================================================================

/// Sheth & Tormen `a`.
const ST_A: f64 = 0.707;
/// Sheth & Tormen `p`.
const ST_P: f64 = 0.3;
/// Sheth & Tormen normalisation.
const ST_NORM: f64 = 0.3222;

/// Tinker08 parameters for Δ = 200: `(A0, a0, b0, c0)`.
const TINKER08: (f64, f64, f64, f64) = (0.186, 1.47, 2.57, 1.19);
/// Redshift slope of the Tinker08 `b` parameter.
const TINKER08_ALPHA: f64 = 1.0676e-2;

/// Fraction of the final mass assembled at the Zhao09 formation time.
const ZHAO09_FRACTION: f64 = 0.04;
/// Redshift span searched above the halo redshift for formation.
const FORMATION_SEARCH_SPAN: f64 = 10.0;

impl Cosmology {
    // =========================================================================
    // Mass functions
    // =========================================================================

    /// Halo mass function `dn/dM` of the selected fit.
    pub fn mass_function(&self, mass: f64, z: f64) -> f64 {
        match self.options.mass_function {
            MassFunctionModel::ShethTormen => self.mass_function_sheth_tormen(mass, z),
            MassFunctionModel::Tinker08 => self.mass_function_tinker08(mass, z),
            MassFunctionModel::Behroozi13 => self.mass_function_behroozi13(mass, z),
        }
    }

    /// Sheth & Tormen (2001) mass function.
    pub fn mass_function_sheth_tormen(&self, mass: f64, z: f64) -> f64 {
        let z0 = self.z_min();
        let growth_ratio = self.growth_factor(z0) / self.growth_factor(z);
        let sigma2 = self.sigma2_mass(mass, z0);
        let nu = growth_ratio * self.delta_c(z) / sigma2.sqrt();

        let sqrt_a = ST_A.sqrt();
        let f_nu = sqrt_a
            * (2.0 / PI).sqrt()
            * ST_NORM
            * (1.0 + (sqrt_a * nu).powf(-2.0 * ST_P))
            * nu
            * (-0.5 * ST_A * nu * nu).exp();

        let dln_sigma = falling_slope(self.dsigma2_dmass(mass, z0), sigma2, mass);
        let rho_0 = self.params.omega_m * self.critical_density(z0);

        rho_0 * dln_sigma * f_nu / mass / self.params.h
    }

    /// Tinker et al. (2008) mass function for Δ = 200.
    pub fn mass_function_tinker08(&self, mass: f64, z: f64) -> f64 {
        let z0 = self.z_min();
        let mass_h = mass / self.params.h;
        let growth_ratio = self.growth_factor(z) / self.growth_factor(z0);

        let rho_0 = self.params.omega_m * self.critical_density_comoving(z0);
        let radius = (0.75 * mass_h / (PI * rho_0)).cbrt();
        let sigma2 = self.sigma2_radius_comoving(radius, z0);
        let dsigma2_dmass = radius * self.dsigma2_dradius_comoving(radius, z0) / (3.0 * mass_h);
        let dln_sigma = falling_slope(dsigma2_dmass, sigma2, mass);
        let sigma = growth_ratio * sigma2.sqrt();

        let (a0, small_a0, b0, c0) = TINKER08;
        let zp1 = 1.0 + z;
        let amplitude = a0 * zp1.powf(-0.14);
        let a = small_a0 * zp1.powf(-0.06);
        let b = b0 * zp1.powf(-TINKER08_ALPHA);
        let f_sigma = amplitude * ((sigma / b).powf(-a) + 1.0) * (-c0 / (sigma * sigma)).exp();

        rho_0 * dln_sigma * f_sigma / mass_h
    }

    /// Tinker08 with the high-redshift correction of Behroozi et al. (2013).
    pub fn mass_function_behroozi13(&self, mass: f64, z: f64) -> f64 {
        let a = 1.0 / (1.0 + z);
        let log_norm = 0.144 / (1.0 + (14.79 * (a - 0.213)).exp());
        let correction = (mass * 3.162_278e-12).powf(0.5 / (1.0 + (6.5 * a).exp()));
        10f64.powf(log_norm * correction) * self.mass_function_tinker08(mass, z)
    }

    // =========================================================================
    // Bias
    // =========================================================================

    /// Large-scale halo bias of the selected fit.
    pub fn halo_bias(&self, mass: f64, z: f64) -> f64 {
        match self.options.halo_bias {
            HaloBiasModel::ShethMoTormen => self.halo_bias_sheth_mo_tormen(mass, z),
            HaloBiasModel::Tinker10 => self.halo_bias_tinker10(mass, z),
        }
    }

    /// Sheth, Mo & Tormen (2001) bias.
    pub fn halo_bias_sheth_mo_tormen(&self, mass: f64, z: f64) -> f64 {
        let z0 = self.z_min();
        let growth_ratio = self.growth_factor(z0) / self.growth_factor(z);
        let delta_c = self.delta_c(z);

        let nu2 = delta_c * delta_c / self.sigma2_mass(mass, z0) * growth_ratio * growth_ratio;
        let a_nu2 = ST_A * nu2;
        let a_nu2_c = a_nu2.powf(0.6);

        1.0 + (a_nu2 + 0.5 * a_nu2 / a_nu2_c - a_nu2_c / (ST_A.sqrt() * (a_nu2_c + 0.14)))
            / delta_c
    }

    /// Tinker et al. (2010) bias for Δ = 200.
    pub fn halo_bias_tinker10(&self, mass: f64, z: f64) -> f64 {
        let z0 = self.z_min();
        let growth_ratio = self.growth_factor(z0) / self.growth_factor(z);
        let delta_c = self.delta_c(z);
        let nu = delta_c / self.sigma2_mass(mass, z0).sqrt() * growth_ratio;

        // y = log10(200)
        let y: f64 = 2.301;
        let exy = (-(4.0 / y).powi(4)).exp();
        let big_a = 1.0 + 0.24 * y * exy;
        let a = 0.44 * y - 0.88;
        let big_b = 0.183;
        let b = 1.5;
        let big_c = 0.019 + 0.107 * y + 0.19 * exy;
        let c = 2.4;

        let nu_a = nu.powf(a);
        1.0 - big_a * nu_a / (nu_a + delta_c.powf(a)) + big_b * nu.powf(b) + big_c * nu.powf(c)
    }

    // =========================================================================
    // Concentration and profile
    // =========================================================================

    /// Halo concentration of the selected relation.
    pub fn concentration(&self, mass: f64, z: f64) -> f64 {
        match self.options.concentration {
            ConcentrationModel::Shimizu03 => self.concentration_shimizu03(mass, z),
            ConcentrationModel::Zhao09 => self.concentration_zhao09(mass, z),
        }
    }

    /// Shimizu et al. (2003), Eq. 4.
    pub fn concentration_shimizu03(&self, mass: f64, z: f64) -> f64 {
        8.0 / (1.0 + z) * (1.0204e-14 * mass * self.params.h).powf(-0.13)
    }

    /// Zhao et al. (2009), Eq. 13.
    ///
    /// Inherits the formation-redshift fallback when the solve fails.
    pub fn concentration_zhao09(&self, mass: f64, z: f64) -> f64 {
        let t_now = self.cosmic_time(z);
        let z_form = self.formation_redshift(mass, ZHAO09_FRACTION, z, z + FORMATION_SEARCH_SPAN);
        let t_form = self.cosmic_time(z_form);
        4.0 * (1.0 + (t_now / (3.75 * t_form)).powf(8.4)).powf(0.125)
    }

    /// Fourier transform of the NFW profile truncated at the virial radius,
    /// normalised to unity at `k -> 0`.
    pub fn density_profile(&self, k: f64, mass: f64, z: f64) -> f64 {
        let c = self.concentration(mass, z);
        let volume = mass / (self.virial_overdensity(z) * self.critical_density(z));
        let r_vir = (0.75 * volume / PI).cbrt();
        let mu = k * r_vir / c;

        let (si_outer, ci_outer) = sine_cosine_integrals(mu * (1.0 + c));
        let (si_inner, ci_inner) = sine_cosine_integrals(mu);

        let value = mu.cos() * (ci_outer - ci_inner) + mu.sin() * (si_outer - si_inner)
            - (mu * c).sin() / (mu * (1.0 + c));

        value / ((1.0 + c).ln() - c / (1.0 + c))
    }

    // =========================================================================
    // Formation time
    // =========================================================================

    /// Redshift at which a halo of `mass` observed at `z_now` had assembled a
    /// fraction `fraction` of it, after Giocoli et al. (2012).
    ///
    /// # Errors
    ///
    /// Returns the root-finder error when the solution is not bracketed by
    /// `[z_now, z_max]` or does not converge.
    pub fn try_formation_redshift(
        &self,
        mass: f64,
        fraction: f64,
        z_now: f64,
        z_max: f64,
    ) -> CosmologyResult<f64> {
        let z0 = self.z_min();
        let alpha_f = 0.815 * (-2.0 * fraction.powi(3)).exp() * fraction.powf(-0.707);
        let omega_f = (2.0 * (1.0 + alpha_f).ln()).sqrt();

        let sigma2_now = self.sigma2_mass(mass, z0);
        let sigma2_progenitor = self.sigma2_mass(mass * fraction, z0);

        let collapse = self.delta_c(z0) * self.growth_factor(z0);
        let target = collapse / self.growth_factor(z_now)
            + omega_f * (sigma2_progenitor - sigma2_now).sqrt();

        let result = find_root(
            |z| collapse / self.growth_factor(z),
            target,
            z_now,
            z_max,
            &SolverConfig::default(),
        )?;
        Ok(result.root)
    }

    /// [`Cosmology::try_formation_redshift`] with failures replaced by the
    /// configured `formation_fallback`.
    pub fn formation_redshift(&self, mass: f64, fraction: f64, z_now: f64, z_max: f64) -> f64 {
        match self.try_formation_redshift(mass, fraction, z_now, z_max) {
            Ok(z) => z,
            Err(err) => {
                warn!(
                    "formation redshift of M = {mass:.3e} in [{z_now}, {z_max}] failed: {err}; using {}",
                    self.options.formation_fallback
                );
                self.options.formation_fallback
            }
        }
    }
}

/// `-d ln σ / dM` from `d σ^2 / dM` and `σ^2`.
///
/// Zero wherever the tabulated variance does not fall with mass, which keeps
/// `dn/dM` non-negative when an under-resolved spectrum aliases the
/// derivative integral.
fn falling_slope(dsigma2_dmass: f64, sigma2: f64, mass: f64) -> f64 {
    let slope = -0.5 * dsigma2_dmass / sigma2;
    if slope > 0.0 && slope.is_finite() {
        slope
    } else {
        debug!("variance does not fall at M = {mass:.3e}; dn/dM set to zero");
        0.0
    }
}
