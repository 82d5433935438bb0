//! Cross-correlation of two galaxy populations.
//!
//! Each population is described by its total occupation `N_g = N_c + N_s`.
//! Squares of one population in the single model become products of the
//! two here, and the normalization is `1 / (n_g1 n_g2)`.

use std::sync::Arc;

use log::debug;

use halox_cosmology::Cosmology;
use halox_math::interpolation::LogInterpolator;

use crate::component::Component;
use crate::error::{ModelError, ModelResult};
use crate::occupation::OccupationModel;
use crate::parallel::try_map_bins;
use crate::tables::HaloTables;

const PIPELINE: &str = "cross";

/// Halo model of the cross-clustering of two galaxy populations.
#[derive(Debug, Clone)]
pub struct CrossHaloModel {
    cosmology: Arc<Cosmology>,
    population1: Arc<dyn OccupationModel>,
    population2: Arc<dyn OccupationModel>,
    tables: HaloTables,
    galaxies1: LogInterpolator,
    galaxies2: LogInterpolator,
    thinness: usize,
}

impl CrossHaloModel {
    /// Builds the model at `redshift` with `thinness` mass and wavenumber
    /// bins.
    ///
    /// # Errors
    ///
    /// Returns an error if the tables cannot be built.
    pub fn new(
        population1: Arc<dyn OccupationModel>,
        population2: Arc<dyn OccupationModel>,
        cosmology: Arc<Cosmology>,
        redshift: f64,
        thinness: usize,
    ) -> ModelResult<Self> {
        let tables = HaloTables::new(&cosmology, redshift, thinness)?;
        let galaxies1 = galaxy_table(&tables, population1.as_ref())?;
        let galaxies2 = galaxy_table(&tables, population2.as_ref())?;
        debug!(
            "Cross halo model for {} x {} at z = {redshift}",
            population1.name(),
            population2.name()
        );

        Ok(Self {
            cosmology,
            population1,
            population2,
            tables,
            galaxies1,
            galaxies2,
            thinness,
        })
    }

    /// Replaces the first population.
    ///
    /// # Errors
    ///
    /// Returns an error if the occupation table cannot be built.
    pub fn set_population1(&mut self, occupation: Arc<dyn OccupationModel>) -> ModelResult<()> {
        self.galaxies1 = galaxy_table(&self.tables, occupation.as_ref())?;
        self.population1 = occupation;
        Ok(())
    }

    /// Replaces the second population.
    ///
    /// # Errors
    ///
    /// Returns an error if the occupation table cannot be built.
    pub fn set_population2(&mut self, occupation: Arc<dyn OccupationModel>) -> ModelResult<()> {
        self.galaxies2 = galaxy_table(&self.tables, occupation.as_ref())?;
        self.population2 = occupation;
        Ok(())
    }

    /// First population.
    pub fn population1(&self) -> &Arc<dyn OccupationModel> {
        &self.population1
    }

    /// Second population.
    pub fn population2(&self) -> &Arc<dyn OccupationModel> {
        &self.population2
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

    /// Mean galaxy density of the first population.
    pub fn mean_galaxy_density_1(&self) -> ModelResult<f64> {
        self.mean_density(&self.galaxies1)
    }

    /// Mean galaxy density of the second population.
    pub fn mean_galaxy_density_2(&self) -> ModelResult<f64> {
        self.mean_density(&self.galaxies2)
    }

    /// Cross power spectrum term on the wavenumber grid.
    ///
    /// # Errors
    ///
    /// Only the total, one-halo and two-halo terms are defined for two
    /// populations; other components are [`ModelError::UnsupportedComponent`].
    pub fn power_spectrum(&self, component: Component) -> ModelResult<Vec<f64>> {
        match component {
            Component::Total => self.power_spectrum_total(),
            Component::OneHalo => self.power_spectrum_1halo(),
            Component::TwoHalo => self.power_spectrum_2halo(),
            other => Err(ModelError::UnsupportedComponent {
                component: other.name(),
                pipeline: PIPELINE,
            }),
        }
    }

    /// One-halo term, `∫ N_g1 N_g2 dn/dM u dM / (n_g1 n_g2)`.
    pub fn power_spectrum_1halo(&self) -> ModelResult<Vec<f64>> {
        let norm = self.normalization()?;
        let pairs = self.galaxies1.multiply(&self.galaxies2)?;
        let weight = pairs.multiply(self.tables.mass_function())?;

        try_map_bins(self.thinness, |i| -> ModelResult<f64> {
            let profile = self.tables.pair_profile(i, &pairs)?;
            Ok(norm * self.tables.integrate_mass(&weight.multiply(&profile)?))
        })
    }

    /// Two-halo term, `P_lin(k) I_1(k) I_2(k) / (n_g1 n_g2)`.
    pub fn power_spectrum_2halo(&self) -> ModelResult<Vec<f64>> {
        let norm = self.normalization()?;
        let halos = self.tables.mass_function().multiply(self.tables.bias())?;
        let weight1 = self.galaxies1.multiply(&halos)?;
        let weight2 = self.galaxies2.multiply(&halos)?;
        let linear = self.tables.linear_power(&self.cosmology);

        try_map_bins(self.thinness, |i| -> ModelResult<f64> {
            let profile = self.tables.profile(i);
            let integral1 = self.tables.integrate_mass(&weight1.multiply(profile)?);
            let integral2 = self.tables.integrate_mass(&weight2.multiply(profile)?);
            Ok(linear[i] * norm * integral1 * integral2)
        })
    }

    /// Total cross power spectrum, one-halo plus two-halo per bin.
    pub fn power_spectrum_total(&self) -> ModelResult<Vec<f64>> {
        let one_halo = self.power_spectrum_1halo()?;
        let two_halo = self.power_spectrum_2halo()?;
        Ok(one_halo.iter().zip(&two_halo).map(|(a, b)| a + b).collect())
    }

    /// Cross correlation function `ξ(r)` at comoving `radii`.
    pub fn correlation_function(&self, component: Component, radii: &[f64]) -> ModelResult<Vec<f64>> {
        let power = self.power_spectrum(component)?;
        self.tables
            .correlation(power, radii, component == Component::Total)
    }

    /// Projected cross correlation `w_p(r_p)`.
    pub fn projected_correlation(&self, component: Component, radii: &[f64]) -> ModelResult<Vec<f64>> {
        let power = self.power_spectrum(component)?;
        self.tables.projected(power, radii)
    }

    /// Angular cross correlation `w(θ)` at angles in radians.
    pub fn angular_correlation(&self, component: Component, theta: &[f64]) -> ModelResult<Vec<f64>> {
        let radii = self.tables.projected_separations(&self.cosmology, theta);
        self.projected_correlation(component, &radii)
    }

    fn mean_density(&self, galaxies: &LogInterpolator) -> ModelResult<f64> {
        let integrand = galaxies.multiply(self.tables.mass_function())?;
        Ok(self.tables.integrate_mass(&integrand))
    }

    fn normalization(&self) -> ModelResult<f64> {
        Ok(1.0 / (self.mean_galaxy_density_1()? * self.mean_galaxy_density_2()?))
    }
}

fn galaxy_table(tables: &HaloTables, occupation: &dyn OccupationModel) -> ModelResult<LogInterpolator> {
    let (central, satellite) = tables.occupation(occupation)?;
    Ok(central.add(&satellite)?)
}
