//! Mass and wavenumber tables shared by the halo-model pipelines.
//!
//! Everything that depends only on the cosmology and the redshift is sampled
//! once here: the mass function, the halo bias and one density-profile
//! table per wavenumber bin, all on the same mass grid. Mass integrals are
//! spline integrals of products of these tables.

use log::debug;

use halox_cosmology::Cosmology;
use halox_math::fftlog::{CorrelationTransform, ProjectedTransform};
use halox_math::grid::{geometric_center, log_space};
use halox_math::interpolation::{Interpolator, LogInterpolator};

use crate::error::{ModelError, ModelResult};
use crate::occupation::OccupationModel;
use crate::parallel::{map_items, try_map_bins};

/// Halo mass integration range `[M_sun]`.
pub const MASS_RANGE: (f64, f64) = (1e5, 1e17);

/// Wavenumber range of the model power spectra.
pub const WAVENUMBER_RANGE: (f64, f64) = (1e-3, 1e3);

/// Tables of the halo population at one redshift.
#[derive(Debug, Clone)]
pub struct HaloTables {
    redshift: f64,
    masses: Vec<f64>,
    wavenumbers: Vec<f64>,
    mass_function: LogInterpolator,
    bias: LogInterpolator,
    masses_table: LogInterpolator,
    /// One table over mass per wavenumber bin
    profiles: Vec<LogInterpolator>,
}

impl HaloTables {
    /// Samples the halo population of `cosmology` at `redshift` with
    /// `thinness` masses and wavenumbers.
    ///
    /// Density profiles are evaluated at the lowest tabulated redshift of
    /// the cosmology, treating halos as comoving.
    ///
    /// # Errors
    ///
    /// Returns an error if `thinness < 2` or a table cannot be built.
    pub fn new(cosmology: &Cosmology, redshift: f64, thinness: usize) -> ModelResult<Self> {
        if thinness < 2 {
            return Err(ModelError::invalid_input(format!(
                "thinness must be at least 2, got {thinness}"
            )));
        }
        if !(redshift >= cosmology.z_min() && redshift <= cosmology.z_max()) {
            return Err(ModelError::invalid_input(format!(
                "redshift {redshift} outside the cosmology range [{}, {}]",
                cosmology.z_min(),
                cosmology.z_max()
            )));
        }

        let (m_min, m_max) = MASS_RANGE;
        let (k_min, k_max) = WAVENUMBER_RANGE;
        let masses = log_space(thinness, m_min, m_max);
        let wavenumbers = log_space(thinness, k_min, k_max);

        let mass_function = mass_table(
            &masses,
            map_items(&masses, |&m| cosmology.mass_function(m, redshift)),
        )?;
        let bias = mass_table(
            &masses,
            map_items(&masses, |&m| cosmology.halo_bias(m, redshift)),
        )?;
        let masses_table = mass_table(&masses, masses.clone())?;

        let z_profile = cosmology.z_min();
        let profiles = try_map_bins(wavenumbers.len(), |i| {
            let k = wavenumbers[i];
            let values = masses
                .iter()
                .map(|&m| cosmology.density_profile(k, m, z_profile))
                .collect();
            mass_table(&masses, values)
        })?;

        debug!(
            "Halo tables at z = {redshift}: {thinness} masses in [{m_min:.0e}, {m_max:.0e}], {thinness} wavenumbers in [{k_min:.0e}, {k_max:.0e}]"
        );

        Ok(Self {
            redshift,
            masses,
            wavenumbers,
            mass_function,
            bias,
            masses_table,
            profiles,
        })
    }

    /// Redshift of the tables.
    pub fn redshift(&self) -> f64 {
        self.redshift
    }

    /// Mass grid.
    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    /// Wavenumber grid.
    pub fn wavenumbers(&self) -> &[f64] {
        &self.wavenumbers
    }

    /// Halo mass function on the mass grid.
    pub fn mass_function(&self) -> &LogInterpolator {
        &self.mass_function
    }

    /// Halo bias on the mass grid.
    pub fn bias(&self) -> &LogInterpolator {
        &self.bias
    }

    /// The identity `M` on the mass grid.
    pub fn mass(&self) -> &LogInterpolator {
        &self.masses_table
    }

    /// Density profile over mass at wavenumber bin `index`.
    pub fn profile(&self, index: usize) -> &LogInterpolator {
        &self.profiles[index]
    }

    /// Central and satellite occupation tables on the mass grid.
    pub fn occupation(
        &self,
        occupation: &dyn OccupationModel,
    ) -> ModelResult<(LogInterpolator, LogInterpolator)> {
        let central = self
            .masses
            .iter()
            .map(|&m| occupation.mean_central(m))
            .collect();
        let satellite = self
            .masses
            .iter()
            .map(|&m| occupation.mean_satellite(m))
            .collect();
        Ok((
            mass_table(&self.masses, central)?,
            mass_table(&self.masses, satellite)?,
        ))
    }

    /// Integral of `table` over the mass range.
    pub fn integrate_mass(&self, table: &LogInterpolator) -> f64 {
        table.integrate(MASS_RANGE.0, MASS_RANGE.1)
    }

    /// Density profile at bin `index` with the pair-count rule applied.
    ///
    /// Where the expected number of pairs exceeds one the profile enters
    /// squared, elsewhere linearly.
    pub fn pair_profile(&self, index: usize, pairs: &LogInterpolator) -> ModelResult<LogInterpolator> {
        Ok(self.profiles[index].combine(pairs, |u, n| if n > 1.0 { u * u } else { u })?)
    }

    /// Linear power spectrum on the wavenumber grid.
    pub fn linear_power(&self, cosmology: &Cosmology) -> Vec<f64> {
        map_items(&self.wavenumbers, |&k| cosmology.power_spectrum(k, self.redshift))
    }

    /// `ξ(r)` at `radii` from a spectrum on the wavenumber grid.
    ///
    /// With `centred`, the transform uses `kr` at the geometric centres of
    /// both grids, otherwise `kr = 1`.
    pub fn correlation(&self, power: Vec<f64>, radii: &[f64], centred: bool) -> ModelResult<Vec<f64>> {
        check_points(radii)?;
        let kr = if centred {
            geometric_center(radii) * geometric_center(&self.wavenumbers)
        } else {
            1.0
        };
        let mut transform = CorrelationTransform::with_kr(self.wavenumbers.clone(), power, kr)?;
        Ok(transform.transform_at(radii)?)
    }

    /// `w_p(r_p)` at `radii` from a spectrum on the wavenumber grid.
    pub fn projected(&self, power: Vec<f64>, radii: &[f64]) -> ModelResult<Vec<f64>> {
        check_points(radii)?;
        let mut transform = ProjectedTransform::new(self.wavenumbers.clone(), power)?;
        Ok(transform.transform_at(radii)?)
    }

    /// Projected separations `θ D_C(z)` for angles in radians.
    pub fn projected_separations(&self, cosmology: &Cosmology, theta: &[f64]) -> Vec<f64> {
        let distance = cosmology.comoving_distance(self.redshift);
        theta.iter().map(|t| t * distance).collect()
    }
}

fn mass_table(masses: &[f64], values: Vec<f64>) -> ModelResult<LogInterpolator> {
    Ok(LogInterpolator::from_samples(masses.to_vec(), values)?)
}

fn check_points(points: &[f64]) -> ModelResult<()> {
    if points.is_empty() {
        return Err(ModelError::invalid_input("no output points requested"));
    }
    if points.iter().any(|&p| !(p > 0.0)) {
        return Err(ModelError::invalid_input("output points must be positive"));
    }
    Ok(())
}
