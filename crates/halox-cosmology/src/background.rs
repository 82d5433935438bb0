//! The cosmological model and its background quantities.

use std::f64::consts::PI;
use std::sync::OnceLock;

use log::debug;

use halox_math::interpolation::{Interpolator, LogInterpolator};

use crate::constants::{
    critical_density_unit, DEFAULT_MAX_REDSHIFT, DEFAULT_THINNESS, HUBBLE_UNIT, PARSEC,
    REDSHIFT_FLOOR, SPEED_OF_LIGHT, VARIANCE_K_RANGE, YEAR,
};
use crate::error::{CosmologyError, CosmologyResult};
use crate::parameters::{CosmologicalParameters, CosmologyOptions, OverdensityModel};

/// A cosmological model with pre-tabulated background functions.
///
/// Built once from parameters and a tabulated present-day linear power
/// spectrum `P0(k)` (`k` in `h/Mpc`, `P` in `(Mpc/h)^3`). All queries are
/// pure functions of the constructed instance.
///
/// Redshift queries are valid on `[z_min, z_max]` and wavenumber queries on
/// the tabulated `k` range. Neither is checked: outside those ranges the
/// tables extrapolate.
///
/// # Example
///
/// ```rust
/// use halox_cosmology::{Cosmology, CosmologicalParameters};
/// use halox_math::grid::log_space;
///
/// let k = log_space(200, 1e-4, 1e4);
/// let cosmo = Cosmology::builder(CosmologicalParameters::default(), k.clone(), k)
///     .with_thinness(200)
///     .build()
///     .unwrap();
///
/// assert_eq!(cosmo.comoving_distance(cosmo.z_min()), 0.0);
/// assert!(cosmo.comoving_distance(1.0) > 3000.0);
/// ```
#[derive(Debug)]
pub struct Cosmology {
    pub(crate) params: CosmologicalParameters,
    pub(crate) options: CosmologyOptions,
    z_min: f64,
    z_max: f64,
    thinness: usize,

    /// `H0` in km/s/Mpc
    hubble_constant: f64,
    /// `1/H0` in years
    hubble_time: f64,
    /// `c/H0` in Mpc
    hubble_distance: f64,

    e_of_z: LogInterpolator,
    /// Shares abscissas with `e_of_z`
    inverse_e: LogInterpolator,
    /// `(1+z)/E^3`, integrand of the growth factor
    growth_integrand: LogInterpolator,
    /// `1/((1+z) E)`, integrand of the cosmic time
    age_integrand: LogInterpolator,
    pub(crate) power_spectrum_0: LogInterpolator,
    /// Identity on the variance wavenumber grid, mapped to each integrand
    pub(crate) variance_grid: LogInterpolator,

    sigma8_normalization: OnceLock<f64>,
}

/// Builder for [`Cosmology`].
#[derive(Debug, Clone)]
pub struct CosmologyBuilder {
    params: CosmologicalParameters,
    options: CosmologyOptions,
    k: Vec<f64>,
    pk: Vec<f64>,
    z_min: f64,
    z_max: f64,
    thinness: usize,
}

impl CosmologyBuilder {
    /// Lower redshift of the background tables, floored at `1e-7`.
    #[must_use]
    pub fn with_z_min(mut self, z_min: f64) -> Self {
        self.z_min = z_min;
        self
    }

    /// Upper redshift of the background tables.
    #[must_use]
    pub fn with_z_max(mut self, z_max: f64) -> Self {
        self.z_max = z_max;
        self
    }

    /// Points per internal table.
    #[must_use]
    pub fn with_thinness(mut self, thinness: usize) -> Self {
        self.thinness = thinness;
        self
    }

    /// Halo fit selections.
    #[must_use]
    pub fn with_options(mut self, options: CosmologyOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the model.
    ///
    /// # Errors
    ///
    /// See [`Cosmology::new`].
    pub fn build(self) -> CosmologyResult<Cosmology> {
        Cosmology::new(
            self.params,
            self.k,
            self.pk,
            self.z_min,
            self.z_max,
            self.thinness,
            self.options,
        )
    }
}

impl Cosmology {
    /// Starts a builder with the default redshift range and resolution.
    pub fn builder(params: CosmologicalParameters, k: Vec<f64>, pk: Vec<f64>) -> CosmologyBuilder {
        CosmologyBuilder {
            params,
            options: CosmologyOptions::default(),
            k,
            pk,
            z_min: REDSHIFT_FLOOR,
            z_max: DEFAULT_MAX_REDSHIFT,
            thinness: DEFAULT_THINNESS,
        }
    }

    /// Builds the model and its tables.
    ///
    /// A non-positive `z_min` is replaced by `1e-7`. The `sigma_8`
    /// normalisation of `P0` is computed here.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid, the redshift range is
    /// empty, `thinness < 2`, or `(k, pk)` is not a valid log-grid table.
    /// Also fails when `thinness` is too coarse for the redshift range: the
    /// `E(z)` table must match the analytic `E(z)` to within 10% between
    /// its knots.
    pub fn new(
        params: CosmologicalParameters,
        k: Vec<f64>,
        pk: Vec<f64>,
        z_min: f64,
        z_max: f64,
        thinness: usize,
        options: CosmologyOptions,
    ) -> CosmologyResult<Self> {
        params.validate()?;

        let z_min = if z_min > 0.0 { z_min } else { REDSHIFT_FLOOR };
        if !(z_max > z_min) {
            return Err(CosmologyError::invalid_input(format!(
                "empty redshift range [{z_min}, {z_max}]"
            )));
        }

        let power_spectrum_0 = LogInterpolator::from_samples(k, pk)?;

        let e_of_z = LogInterpolator::from_fn(|z| e2_of(&params, z).sqrt(), z_min, z_max, thinness)?;
        check_expansion_table(&params, &e_of_z)?;
        let inverse_e = e_of_z.map_values(|e| 1.0 / e);

        let one_plus_z = e_of_z.with_values(e_of_z.x_values().iter().map(|z| 1.0 + z).collect())?;
        let growth_integrand = one_plus_z
            .multiply(&inverse_e)?
            .multiply(&inverse_e)?
            .multiply(&inverse_e)?;
        let age_integrand = inverse_e.combine(&one_plus_z, |inv_e, zp1| inv_e / zp1)?;

        let (k_min, k_max) = VARIANCE_K_RANGE;
        let variance_grid = LogInterpolator::from_fn(|k| k, k_min, k_max, thinness)?;

        let hubble_constant = HUBBLE_UNIT * params.h;

        debug!(
            "Cosmology tables: z in [{:.1e}, {:.1e}], {} points, P0 with {} points",
            z_min,
            z_max,
            thinness,
            power_spectrum_0.len()
        );

        let cosmology = Self {
            params,
            options,
            z_min,
            z_max,
            thinness,
            hubble_constant,
            hubble_time: 1e3 * PARSEC / (YEAR * hubble_constant),
            hubble_distance: 1e-3 * SPEED_OF_LIGHT / hubble_constant,
            e_of_z,
            inverse_e,
            growth_integrand,
            age_integrand,
            power_spectrum_0,
            variance_grid,
            sigma8_normalization: OnceLock::new(),
        };

        // Filled before the model can be shared
        cosmology.sigma8_normalization();

        Ok(cosmology)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Model parameters.
    pub fn parameters(&self) -> &CosmologicalParameters {
        &self.params
    }

    /// Halo fit selections.
    pub fn options(&self) -> &CosmologyOptions {
        &self.options
    }

    /// Lower redshift of the tables.
    pub fn z_min(&self) -> f64 {
        self.z_min
    }

    /// Upper redshift of the tables.
    pub fn z_max(&self) -> f64 {
        self.z_max
    }

    /// Points per internal table.
    pub fn thinness(&self) -> usize {
        self.thinness
    }

    /// Present-day power spectrum table.
    pub fn initial_power_spectrum(&self) -> &LogInterpolator {
        &self.power_spectrum_0
    }

    /// `sigma_8^2` of the tabulated `P0`, before renormalisation.
    pub fn sigma8_normalization(&self) -> f64 {
        *self
            .sigma8_normalization
            .get_or_init(|| self.unnormalized_sigma8_squared())
    }

    pub(crate) fn growth_integrand(&self) -> &LogInterpolator {
        &self.growth_integrand
    }

    // =========================================================================
    // Expansion
    // =========================================================================

    /// Squared dimensionless expansion rate `E^2(z)`.
    pub fn e2(&self, z: f64) -> f64 {
        e2_of(&self.params, z)
    }

    /// Scale-factor form `a^4 E^2(z)`, cheaper for `Omega_M(z)`.
    pub fn ea2(&self, z: f64) -> f64 {
        let a = 1.0 / (1.0 + z);
        let p = &self.params;
        let de = p.omega_l * dark_energy_evolution(p, z);
        ((de * a * a + p.omega_k) * a + p.omega_m) * a + p.omega_r + p.omega_n
    }

    /// Dimensionless expansion rate `E(z)` from the table.
    pub fn e(&self, z: f64) -> f64 {
        self.e_of_z.evaluate(z)
    }

    /// `1 / E(z)` from the table.
    pub fn inverse_e(&self, z: f64) -> f64 {
        self.inverse_e.evaluate(z)
    }

    /// Hubble constant `H0` `[km / s / Mpc]`.
    pub fn hubble_constant(&self) -> f64 {
        self.hubble_constant
    }

    /// Hubble time `1/H0` `[yr]`.
    pub fn hubble_time(&self) -> f64 {
        self.hubble_time
    }

    /// Hubble distance `c/H0` `[Mpc]`.
    pub fn hubble_distance_0(&self) -> f64 {
        self.hubble_distance
    }

    /// Hubble parameter `H(z)` `[km / s / Mpc]`.
    pub fn hubble(&self, z: f64) -> f64 {
        self.hubble_constant * self.e(z)
    }

    /// Hubble distance `c / H(z)` `[Mpc]`.
    pub fn hubble_distance(&self, z: f64) -> f64 {
        1e-3 * SPEED_OF_LIGHT / self.hubble(z)
    }

    // =========================================================================
    // Distances and volumes
    // =========================================================================

    /// Line-of-sight comoving distance from `z_min` `[Mpc]`.
    ///
    /// Exactly zero at `z_min`.
    pub fn comoving_distance(&self, z: f64) -> f64 {
        self.hubble_distance * self.inverse_e.integrate(self.z_min, z)
    }

    /// `dD_C / dz` `[Mpc]`.
    pub fn comoving_distance_derivative(&self, z: f64) -> f64 {
        self.hubble_distance * self.inverse_e(z)
    }

    /// Angular-diameter distance `D_C / (1 + z)` `[Mpc]`.
    pub fn angular_diameter_distance(&self, z: f64) -> f64 {
        self.comoving_distance(z) / (1.0 + z)
    }

    /// Comoving volume element `dV / dz / dΩ` `[Mpc^3 / sr]`.
    pub fn comoving_volume_element(&self, z: f64) -> f64 {
        let integral = self.inverse_e.integrate(self.z_min, z);
        self.hubble_distance.powi(3) * self.inverse_e(z) * integral * integral
    }

    /// Comoving volume within `z`, `4π/3 D_C^3` `[Mpc^3]`.
    pub fn comoving_volume(&self, z: f64) -> f64 {
        let dc = self.comoving_distance(z);
        4.0 / 3.0 * PI * dc * dc * dc
    }

    /// Age of the Universe at `z` `[Gyr]`.
    pub fn cosmic_time(&self, z: f64) -> f64 {
        1e-9 * self.hubble_time * self.age_integrand.integrate(z, self.z_max)
    }

    // =========================================================================
    // Densities
    // =========================================================================

    /// Critical density `[h^2 M_sun / Mpc^3]`.
    pub fn critical_density_comoving(&self, z: f64) -> f64 {
        critical_density_unit() * self.e2(z)
    }

    /// Critical density `[M_sun / Mpc^3]`.
    pub fn critical_density(&self, z: f64) -> f64 {
        self.critical_density_comoving(z) * self.params.h * self.params.h
    }

    /// Matter density parameter at `z`.
    pub fn omega_m(&self, z: f64) -> f64 {
        self.params.omega_m / (self.ea2(z) * (1.0 + z))
    }

    /// Baryon density parameter at `z`.
    pub fn omega_b(&self, z: f64) -> f64 {
        self.params.omega_b / (self.ea2(z) * (1.0 + z))
    }

    /// Linear collapse threshold `δ_c(z)`.
    pub fn delta_c(&self, z: f64) -> f64 {
        1.686 * (1.0 + 0.012_299 * self.omega_m(z).log10())
    }

    /// Virial overdensity with respect to the critical density, Bryan & Norman.
    pub fn virial_overdensity_bryan_norman(&self, z: f64) -> f64 {
        let x = self.omega_m(z) - 1.0;
        (-39.0 * x + 82.0) * x + 18.0 * PI * PI
    }

    /// Virial overdensity, Nakamura & Suto.
    pub fn virial_overdensity_nakamura_suto(&self, z: f64) -> f64 {
        let x = (1.0 - self.params.omega_m).cbrt() / (1.0 + z);
        18.0 * PI * (1.0 + 0.4093 * x.powf(2.7152)) * self.omega_m(z)
    }

    /// Virial overdensity of the selected model.
    pub fn virial_overdensity(&self, z: f64) -> f64 {
        match self.options.overdensity {
            OverdensityModel::BryanNorman => self.virial_overdensity_bryan_norman(z),
            OverdensityModel::NakamuraSuto => self.virial_overdensity_nakamura_suto(z),
        }
    }
}

/// Largest relative error of the `E(z)` table between knots.
const EXPANSION_TABLE_TOLERANCE: f64 = 0.1;

/// Compares the `E(z)` table with the analytic `E(z)` at the geometric
/// mid-point of every knot interval.
///
/// The spline of `z E(z)` has free ends, and at low thinness the error at
/// `z_max` leaks inward until the table is negative at `z ~ 1`.
fn check_expansion_table(
    params: &CosmologicalParameters,
    table: &LogInterpolator,
) -> CosmologyResult<()> {
    for pair in table.x_values().windows(2) {
        let z = (pair[0] * pair[1]).sqrt();
        let tabulated = table.evaluate(z);
        let exact = e2_of(params, z).sqrt();
        let error = (tabulated / exact - 1.0).abs();
        if !(tabulated > 0.0 && tabulated.is_finite() && error <= EXPANSION_TABLE_TOLERANCE) {
            return Err(CosmologyError::invalid_input(format!(
                "E(z) table with {} points gives {tabulated:.6e} at z = {z:.3e} (exact {exact:.6e}); increase the thinness",
                table.len()
            )));
        }
    }
    Ok(())
}

/// `E^2(z)` for the given parameters.
fn e2_of(p: &CosmologicalParameters, z: f64) -> f64 {
    let zp1 = 1.0 + z;
    let sum = ((p.omega_r + p.omega_n) * zp1 + p.omega_m) * zp1 + p.omega_k;
    zp1 * zp1 * sum + p.omega_l * dark_energy_evolution(p, z)
}

/// `rho_DE(z) / rho_DE(0)` for the CPL equation of state; exactly 1 for Λ.
fn dark_energy_evolution(p: &CosmologicalParameters, z: f64) -> f64 {
    if p.is_lambda() {
        return 1.0;
    }
    let zp1 = 1.0 + z;
    zp1.powf(3.0 * (1.0 + p.w0 + p.wa)) * (-3.0 * p.wa * z / zp1).exp()
}
