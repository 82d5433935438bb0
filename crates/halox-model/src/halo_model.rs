//! Single-population halo model.
//!
//! The galaxy power spectrum is split into pairs hosted by one halo
//! (central-satellite and satellite-satellite) and pairs in distinct
//! halos. Every mass integral is the spline integral of a product of
//! tables sampled on the shared mass grid of [`HaloTables`].

use std::sync::Arc;

use log::debug;

use halox_cosmology::Cosmology;
use halox_math::interpolation::LogInterpolator;

use crate::component::Component;
use crate::error::ModelResult;
use crate::occupation::OccupationModel;
use crate::parallel::try_map_bins;
use crate::tables::HaloTables;

/// Halo model of one galaxy population.
///
/// Cosmology-dependent tables are built once; replacing the occupation
/// model rebuilds only the occupation tables.
#[derive(Debug, Clone)]
pub struct HaloModel {
    cosmology: Arc<Cosmology>,
    occupation: Arc<dyn OccupationModel>,
    tables: HaloTables,
    central: LogInterpolator,
    satellite: LogInterpolator,
    thinness: usize,
}

impl HaloModel {
    /// Builds the model at `redshift` with `thinness` mass and wavenumber
    /// bins.
    ///
    /// # Errors
    ///
    /// Returns an error if the tables cannot be built.
    pub fn new(
        occupation: Arc<dyn OccupationModel>,
        cosmology: Arc<Cosmology>,
        redshift: f64,
        thinness: usize,
    ) -> ModelResult<Self> {
        let tables = HaloTables::new(&cosmology, redshift, thinness)?;
        let (central, satellite) = tables.occupation(occupation.as_ref())?;
        debug!("Halo model for {} at z = {redshift}", occupation.name());

        Ok(Self {
            cosmology,
            occupation,
            tables,
            central,
            satellite,
            thinness,
        })
    }

    /// Replaces the occupation model.
    ///
    /// # Errors
    ///
    /// Returns an error if the occupation tables cannot be built; the
    /// model is left unchanged in that case.
    pub fn set_occupation(&mut self, occupation: Arc<dyn OccupationModel>) -> ModelResult<()> {
        let (central, satellite) = self.tables.occupation(occupation.as_ref())?;
        self.occupation = occupation;
        self.central = central;
        self.satellite = satellite;
        Ok(())
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Occupation model.
    pub fn occupation(&self) -> &Arc<dyn OccupationModel> {
        &self.occupation
    }

    /// Cosmology.
    pub fn cosmology(&self) -> &Arc<Cosmology> {
        &self.cosmology
    }

    /// Redshift of the model.
    pub fn redshift(&self) -> f64 {
        self.tables.redshift()
    }

    /// Number of mass and wavenumber bins.
    pub fn thinness(&self) -> usize {
        self.thinness
    }

    /// Wavenumbers of the model power spectra.
    pub fn wavenumbers(&self) -> &[f64] {
        self.tables.wavenumbers()
    }

    /// Halo masses of the integration grid.
    pub fn masses(&self) -> &[f64] {
        self.tables.masses()
    }

    // =========================================================================
    // POPULATION STATISTICS
    // =========================================================================

    /// Mean comoving number density of galaxies,
    /// `n_g = ∫ (N_c + N_s) dn/dM dM`.
    pub fn mean_galaxy_density(&self) -> ModelResult<f64> {
        let weight = self.galaxy_weight()?;
        Ok(self.tables.integrate_mass(&weight))
    }

    /// Large-scale galaxy bias, `∫ (N_c + N_s) dn/dM b dM / n_g`.
    pub fn bias(&self) -> ModelResult<f64> {
        let integrand = self.galaxy_weight()?.multiply(self.tables.bias())?;
        Ok(self.tables.integrate_mass(&integrand) / self.mean_galaxy_density()?)
    }

    /// Mean mass of the halos hosting the galaxies.
    pub fn mean_halo_mass(&self) -> ModelResult<f64> {
        let integrand = self.galaxy_weight()?.multiply(self.tables.mass())?;
        Ok(self.tables.integrate_mass(&integrand) / self.mean_galaxy_density()?)
    }

    /// Galaxy number density per unit halo mass, `(N_c + N_s) dn/dM`, at
    /// the model redshift.
    pub fn galaxy_mass_density(&self, mass: f64) -> f64 {
        self.occupation.mean_galaxies(mass) * self.cosmology.mass_function(mass, self.redshift())
    }

    // =========================================================================
    // POWER SPECTRA
    // =========================================================================

    /// Galaxy power spectrum term on the wavenumber grid.
    pub fn power_spectrum(&self, component: Component) -> ModelResult<Vec<f64>> {
        match component {
            Component::Total => self.power_spectrum_total(),
            Component::OneHalo => self.power_spectrum_1halo(),
            Component::CentralSatellite => self.power_spectrum_cs(),
            Component::SatelliteSatellite => self.power_spectrum_ss(),
            Component::TwoHalo => self.power_spectrum_2halo(),
            Component::LargeScale => self.power_spectrum_large_scale(),
        }
    }

    /// Central-satellite pairs, `2 ∫ N_c N_s dn/dM u dM / n_g²`.
    pub fn power_spectrum_cs(&self) -> ModelResult<Vec<f64>> {
        let pairs = self.central.multiply(&self.satellite)?;
        let weight = pairs.multiply(self.tables.mass_function())?.scale(2.0);
        self.pair_term(&pairs, &weight, self.inverse_density_squared()?)
    }

    /// Satellite-satellite pairs, `∫ N_s² dn/dM u dM / n_g²`.
    pub fn power_spectrum_ss(&self) -> ModelResult<Vec<f64>> {
        let pairs = self.satellite.multiply(&self.satellite)?;
        let weight = pairs.multiply(self.tables.mass_function())?;
        self.pair_term(&pairs, &weight, self.inverse_density_squared()?)
    }

    /// One-halo term, central-satellite plus satellite-satellite.
    pub fn power_spectrum_1halo(&self) -> ModelResult<Vec<f64>> {
        let cs = self.power_spectrum_cs()?;
        let ss = self.power_spectrum_ss()?;
        Ok(cs.iter().zip(&ss).map(|(a, b)| a + b).collect())
    }

    /// Two-halo term, `P_lin(k) [∫ (N_c + N_s) dn/dM b u dM]² / n_g²`.
    pub fn power_spectrum_2halo(&self) -> ModelResult<Vec<f64>> {
        let norm = self.inverse_density_squared()?;
        let weight = self.galaxy_weight()?.multiply(self.tables.bias())?;
        let linear = self.tables.linear_power(&self.cosmology);

        try_map_bins(self.thinness, |i| -> ModelResult<f64> {
            let integral = self.tables.integrate_mass(&weight.multiply(self.tables.profile(i))?);
            Ok(linear[i] * norm * integral * integral)
        })
    }

    /// Total galaxy power spectrum, one-halo plus two-halo per bin.
    pub fn power_spectrum_total(&self) -> ModelResult<Vec<f64>> {
        let one_halo = self.power_spectrum_1halo()?;
        let two_halo = self.power_spectrum_2halo()?;
        Ok(one_halo.iter().zip(&two_halo).map(|(a, b)| a + b).collect())
    }

    /// Linear power spectrum scaled by the squared galaxy bias.
    pub fn power_spectrum_large_scale(&self) -> ModelResult<Vec<f64>> {
        let b = self.bias()?;
        Ok(self
            .tables
            .linear_power(&self.cosmology)
            .into_iter()
            .map(|p| b * b * p)
            .collect())
    }

    // =========================================================================
    // REAL-SPACE STATISTICS
    // =========================================================================

    /// Correlation function `ξ(r)` at comoving `radii`.
    ///
    /// The total transform is centred on the geometric middle of the radii
    /// and the wavenumber grid; component transforms use `kr = 1`.
    pub fn correlation_function(&self, component: Component, radii: &[f64]) -> ModelResult<Vec<f64>> {
        let power = self.power_spectrum(component)?;
        self.tables
            .correlation(power, radii, component == Component::Total)
    }

    /// Projected correlation `w_p(r_p)` at projected `radii`.
    pub fn projected_correlation(&self, component: Component, radii: &[f64]) -> ModelResult<Vec<f64>> {
        let power = self.power_spectrum(component)?;
        self.tables.projected(power, radii)
    }

    /// Angular correlation `w(θ)` at angles `theta` in radians.
    pub fn angular_correlation(&self, component: Component, theta: &[f64]) -> ModelResult<Vec<f64>> {
        let radii = self.tables.projected_separations(&self.cosmology, theta);
        self.projected_correlation(component, &radii)
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    /// `(N_c + N_s) dn/dM` on the mass grid.
    fn galaxy_weight(&self) -> ModelResult<LogInterpolator> {
        Ok(self
            .central
            .add(&self.satellite)?
            .multiply(self.tables.mass_function())?)
    }

    fn inverse_density_squared(&self) -> ModelResult<f64> {
        let ng = self.mean_galaxy_density()?;
        Ok(1.0 / (ng * ng))
    }

    /// `norm ∫ weight u_p dM` per wavenumber bin, with `u_p` the density
    /// profile under the pair-count rule for `pairs`.
    fn pair_term(
        &self,
        pairs: &LogInterpolator,
        weight: &LogInterpolator,
        norm: f64,
    ) -> ModelResult<Vec<f64>> {
        try_map_bins(self.thinness, |i| -> ModelResult<f64> {
            let profile = self.tables.pair_profile(i, pairs)?;
            Ok(norm * self.tables.integrate_mass(&weight.multiply(&profile)?))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occupation::{Harikane16, Tinker10};
    use approx::assert_relative_eq;
    use halox_cosmology::CosmologicalParameters;
    use halox_math::grid::log_space;

    fn cosmology() -> Arc<Cosmology> {
        let k = log_space(200, 1e-4, 1e4);
        let pk = k.iter().map(|&k| k / (1.0 + (k / 0.02).powi(2)).powi(2)).collect();
        Arc::new(
            Cosmology::builder(CosmologicalParameters::default(), k, pk)
                .with_thinness(200)
                .build()
                .unwrap(),
        )
    }

    fn model() -> HaloModel {
        let hod: Arc<dyn OccupationModel> = Arc::new(Harikane16::new(0.5, 1e11, 1.0, 1e11, 1e11, 1.0));
        HaloModel::new(hod, cosmology(), 1.0, 25).unwrap()
    }

    #[test]
    fn test_population_statistics() {
        let model = model();
        let ng = model.mean_galaxy_density().unwrap();
        assert!(ng > 0.0 && ng.is_finite());
        assert!(model.bias().unwrap() > 0.0);

        let mean_mass = model.mean_halo_mass().unwrap();
        assert!(mean_mass > 1e5 && mean_mass < 1e17);
    }

    #[test]
    fn test_mean_density_is_repeatable() {
        let model = model();
        let first = model.mean_galaxy_density().unwrap();
        let second = model.mean_galaxy_density().unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_total_is_sum_of_terms() {
        let model = model();
        let total = model.power_spectrum_total().unwrap();
        let one = model.power_spectrum_1halo().unwrap();
        let two = model.power_spectrum_2halo().unwrap();
        assert_eq!(total.len(), model.thinness());
        for i in 0..total.len() {
            assert_eq!(total[i], one[i] + two[i]);
        }
    }

    #[test]
    fn test_one_halo_is_sum_of_pairs() {
        let model = model();
        let one = model.power_spectrum(Component::OneHalo).unwrap();
        let cs = model.power_spectrum(Component::CentralSatellite).unwrap();
        let ss = model.power_spectrum(Component::SatelliteSatellite).unwrap();
        for i in 0..one.len() {
            assert_eq!(one[i], cs[i] + ss[i]);
        }
    }

    #[test]
    fn test_large_scale_is_biased_linear_power() {
        let model = model();
        let b = model.bias().unwrap();
        let large_scale = model.power_spectrum_large_scale().unwrap();
        let cosmo = model.cosmology();
        for (k, p) in model.wavenumbers().iter().zip(&large_scale) {
            assert_relative_eq!(*p, b * b * cosmo.power_spectrum(*k, 1.0), max_relative = 1e-12);
        }
    }

    #[test]
    fn test_set_occupation_keeps_cosmology_tables() {
        let mut model = model();
        let before = model.mean_galaxy_density().unwrap();
        let masses = model.masses().to_vec();

        let richer: Arc<dyn OccupationModel> = Arc::new(Harikane16::new(0.5, 1e11, 1.0, 1e11, 1e10, 1.0));
        model.set_occupation(richer).unwrap();
        assert!(model.mean_galaxy_density().unwrap() > before);
        assert_eq!(model.masses(), masses.as_slice());

        let other: Arc<dyn OccupationModel> = Arc::new(Tinker10::new(1e11, 0.5, 1e12, 1.0));
        model.set_occupation(other).unwrap();
        assert_eq!(model.occupation().name(), "tinker10");
    }

    #[test]
    fn test_galaxy_mass_density() {
        let model = model();
        let m = 1e12;
        let expected = model.occupation().mean_galaxies(m) * model.cosmology().mass_function(m, 1.0);
        assert_eq!(model.galaxy_mass_density(m), expected);
    }

    #[test]
    fn test_real_space_statistics_have_requested_length() {
        let model = model();
        let radii = log_space(8, 0.1, 10.0);
        assert_eq!(model.correlation_function(Component::Total, &radii).unwrap().len(), 8);
        assert_eq!(model.projected_correlation(Component::TwoHalo, &radii).unwrap().len(), 8);

        let theta = log_space(5, 1e-4, 1e-2);
        let w = model.angular_correlation(Component::LargeScale, &theta).unwrap();
        assert_eq!(w.len(), 5);
        assert!(w.iter().all(|v| v.is_finite()));
    }
}
