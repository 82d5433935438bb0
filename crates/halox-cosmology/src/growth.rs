//! Linear growth, the linear power spectrum and its filtered variance.
//!
//! Wavenumbers are in `h/Mpc` and radii in `Mpc/h` for the `_comoving`
//! variants. The plain variants take `1/Mpc` and `Mpc`.

use std::f64::consts::PI;

use halox_math::interpolation::Interpolator;
use halox_math::special::{top_hat_window, top_hat_window_derivative};

use crate::background::Cosmology;
use crate::constants::{SIGMA8_RADIUS, VARIANCE_K_RANGE};

impl Cosmology {
    /// Linear growth factor after Hamilton (2001).
    ///
    /// `D(z) = 5/2 Ω_M E(z) ∫_z^{z_max} (1+z')/E(z')^3 dz'`.
    ///
    /// Not normalised to unity today: ratios `D(z) / D(z_min)` are what
    /// the halo statistics use.
    pub fn growth_factor(&self, z: f64) -> f64 {
        2.5 * self.params.omega_m * self.e(z) * self.growth_integrand().integrate(z, self.z_max())
    }

    /// Growth of the scale-dependent amplitude, `(1 + z) D(z)`.
    pub fn scaled_growth_factor(&self, z: f64) -> f64 {
        (1.0 + z) * self.growth_factor(z)
    }

    /// Amplitude relating `P(k, z)` to the tabulated `P0(k)`.
    ///
    /// `sigma_8^2 (D(z)/D(z_min))^2 / sigma_8^2[P0]`.
    fn power_amplitude(&self, z: f64) -> f64 {
        let sigma8 = self.params.sigma8;
        let ratio = self.growth_factor(z) / self.growth_factor(self.z_min());
        sigma8 * sigma8 * ratio * ratio / self.sigma8_normalization()
    }

    /// Linear power spectrum, `k` in `h/Mpc`, result in `(Mpc/h)^3`.
    pub fn power_spectrum_comoving(&self, k: f64, z: f64) -> f64 {
        self.power_amplitude(z) * self.power_spectrum_0.evaluate(k)
    }

    /// Linear power spectrum, `k` in `1/Mpc`, result in `Mpc^3`.
    pub fn power_spectrum(&self, k: f64, z: f64) -> f64 {
        let h = self.params.h;
        self.power_amplitude(z) * self.power_spectrum_0.evaluate(k / h) / (h * h * h)
    }

    /// `sigma_8^2` of the tabulated `P0` as given.
    pub(crate) fn unnormalized_sigma8_squared(&self) -> f64 {
        let p0 = &self.power_spectrum_0;
        self.variance_integral(|k| {
            let w = top_hat_window(SIGMA8_RADIUS * k);
            k * k * p0.evaluate(k) * w * w
        }) / (2.0 * PI * PI)
    }

    // =========================================================================
    // Variance of the smoothed field
    // =========================================================================

    /// `sigma^2(R, z)` for `R` in `Mpc/h`.
    pub fn sigma2_radius_comoving(&self, radius: f64, z: f64) -> f64 {
        let p0 = &self.power_spectrum_0;
        let integral = self.variance_integral(|k| {
            let w = top_hat_window(radius * k);
            k * k * p0.evaluate(k) * w * w
        });
        self.power_amplitude(z) * integral / (2.0 * PI * PI)
    }

    /// `sigma^2(R, z)` for `R` in `Mpc`.
    pub fn sigma2_radius(&self, radius: f64, z: f64) -> f64 {
        let h = self.params.h;
        let p0 = &self.power_spectrum_0;
        let integral = self.variance_integral(|k| {
            let w = top_hat_window(radius * k);
            k * k * p0.evaluate(k / h) / (h * h * h) * w * w
        });
        self.power_amplitude(z) * integral / (2.0 * PI * PI)
    }

    /// `d sigma^2 / dR` for `R` in `Mpc/h`.
    pub fn dsigma2_dradius_comoving(&self, radius: f64, z: f64) -> f64 {
        let p0 = &self.power_spectrum_0;
        let integral = self.variance_integral(|k| {
            let x = radius * k;
            k * k * k * p0.evaluate(k) * top_hat_window(x) * top_hat_window_derivative(x)
        });
        self.power_amplitude(z) * integral / (PI * PI)
    }

    /// `d sigma^2 / dR` for `R` in `Mpc`.
    pub fn dsigma2_dradius(&self, radius: f64, z: f64) -> f64 {
        let h = self.params.h;
        let p0 = &self.power_spectrum_0;
        let integral = self.variance_integral(|k| {
            let x = radius * k;
            k * k * k * p0.evaluate(k / h) / (h * h * h)
                * top_hat_window(x)
                * top_hat_window_derivative(x)
        });
        self.power_amplitude(z) * integral / (PI * PI)
    }

    /// Integral of `integrand` over the variance wavenumber range, on the
    /// grid validated at construction.
    fn variance_integral<F>(&self, integrand: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        let (k_min, k_max) = VARIANCE_K_RANGE;
        self.variance_grid.map_values(integrand).integrate(k_min, k_max)
    }

    /// Lagrangian radius `[Mpc]` enclosing `mass` `[M_sun]` at the mean
    /// matter density of `z_min`.
    pub fn lagrangian_radius(&self, mass: f64) -> f64 {
        let z0 = self.z_min();
        let rho = self.omega_m(z0) * self.critical_density(z0);
        (0.75 * mass / (PI * rho)).cbrt()
    }

    /// `sigma^2(M, z)` for `M` in `M_sun`.
    pub fn sigma2_mass(&self, mass: f64, z: f64) -> f64 {
        self.sigma2_radius(self.lagrangian_radius(mass), z)
    }

    /// `d sigma^2 / dM` for `M` in `M_sun`.
    ///
    /// Uses the same mass-radius relation as [`Cosmology::sigma2_mass`].
    pub fn dsigma2_dmass(&self, mass: f64, z: f64) -> f64 {
        let radius = self.lagrangian_radius(mass);
        radius * self.dsigma2_dradius(radius, z) / (3.0 * mass)
    }
}

#[cfg(test)]
mod tests {
    use crate::constants::VARIANCE_K_RANGE;
    use crate::{Cosmology, CosmologicalParameters};
    use approx::assert_relative_eq;
    use halox_math::grid::log_space;
    use halox_math::interpolation::{Interpolator, LogInterpolator};

    /// Eisenstein-Hu-like shape, enough to exercise the variance integrals.
    fn cdm_like(k: f64) -> f64 {
        let q = k / 0.2;
        k / (1.0 + q * q).powf(2.0)
    }

    fn model() -> Cosmology {
        let k = log_space(300, 1e-4, 1e4);
        let pk = k.iter().map(|&k| cdm_like(k)).collect();
        Cosmology::builder(CosmologicalParameters::default(), k, pk)
            .with_thinness(200)
            .build()
            .unwrap()
    }

    #[test]
    fn test_growth_decreases_with_redshift() {
        let cosmo = model();
        let mut previous = cosmo.growth_factor(cosmo.z_min());
        for &z in &[0.1, 0.5, 1.0, 2.0, 5.0, 10.0] {
            let d = cosmo.growth_factor(z);
            assert!(d < previous, "D({z}) = {d} >= {previous}");
            previous = d;
        }
    }

    #[test]
    fn test_growth_matter_domination() {
        let cosmo = model();
        // D(z) ~ 1/(1+z) in the matter era, so g(z) flattens out
        let ratio = cosmo.scaled_growth_factor(50.0) / cosmo.scaled_growth_factor(100.0);
        assert_relative_eq!(ratio, 1.0, max_relative = 1e-2);
        // LCDM suppression today, D(0) ~ 0.78 relative to EdS
        let today = cosmo.growth_factor(cosmo.z_min());
        assert!(today > 0.7 && today < 0.85, "D(0) = {today}");
    }

    #[test]
    fn test_sigma8_is_reproduced() {
        let cosmo = model();
        assert!(cosmo.sigma8_normalization() > 0.0);
        let sigma2 = cosmo.sigma2_radius_comoving(8.0, cosmo.z_min());
        assert_relative_eq!(sigma2.sqrt(), 0.8, max_relative = 1e-6);
    }

    #[test]
    fn test_power_spectrum_units() {
        let cosmo = model();
        let h = 0.7;
        let z = 0.5;
        assert_relative_eq!(
            cosmo.power_spectrum(0.1 * h, z),
            cosmo.power_spectrum_comoving(0.1, z) / (h * h * h),
            max_relative = 1e-12
        );
        let growth = cosmo.growth_factor(z) / cosmo.growth_factor(cosmo.z_min());
        assert_relative_eq!(
            cosmo.power_spectrum_comoving(0.1, z),
            cosmo.power_spectrum_comoving(0.1, cosmo.z_min()) * growth * growth,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_variance_decreases_with_scale() {
        let cosmo = model();
        let z = cosmo.z_min();
        assert!(cosmo.sigma2_radius(1.0, z) > cosmo.sigma2_radius(10.0, z));
        assert!(cosmo.dsigma2_dradius(5.0, z) < 0.0);
        assert!(cosmo.dsigma2_dradius_comoving(5.0, z) < 0.0);
        assert!(cosmo.sigma2_mass(1e12, z) > cosmo.sigma2_mass(1e14, z));
        assert!(cosmo.dsigma2_dmass(1e13, z) < 0.0);
    }

    #[test]
    fn test_variance_derivative_matches_finite_difference() {
        let cosmo = model();
        let z = cosmo.z_min();
        let r = 5.0;
        let step = 1e-3 * r;
        let numeric = (cosmo.sigma2_radius_comoving(r + step, z)
            - cosmo.sigma2_radius_comoving(r - step, z))
            / (2.0 * step);
        assert_relative_eq!(
            cosmo.dsigma2_dradius_comoving(r, z),
            numeric,
            max_relative = 1e-2
        );
    }

    #[test]
    fn test_variance_integral_uses_the_model_grid() {
        let cosmo = model();
        let (k_min, k_max) = VARIANCE_K_RANGE;
        let direct = LogInterpolator::from_fn(|k| k * k, k_min, k_max, cosmo.thinness())
            .unwrap()
            .integrate(k_min, k_max);
        assert_relative_eq!(cosmo.variance_integral(|k| k * k), direct, max_relative = 1e-14);
        assert_relative_eq!(direct, (k_max.powi(3) - k_min.powi(3)) / 3.0, max_relative = 1e-3);
    }
}
