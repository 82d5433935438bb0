//! Run configuration.
//!
//! A run is described by one TOML file:
//!
//! ```toml
//! [cosmology]
//! omega_m = 0.3
//! sigma8 = 0.8
//!
//! [options]
//! mass_function = "tinker08"
//!
//! [occupation]
//! model = "tinker10"
//! a_min = 1e11
//! sigma_log_a = 0.5
//! a_sat = 1e12
//! alpha_sat = 1.0
//!
//! [pipeline]
//! redshift = 1.0
//! thinness = 50
//! power_spectrum = "pk.dat"
//! ```
//!
//! Every table and key is optional. Without `power_spectrum` a BBKS
//! transfer-function spectrum is used as the seed.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use halox_cosmology::io::read_power_spectrum;
use halox_cosmology::{CosmologicalParameters, Cosmology, CosmologyOptions};
use halox_math::grid::log_space;
use halox_model::{HaloModel, OccupationParameters};

use crate::error::{CliError, CliResult};

/// Number of wavenumbers of the built-in seed spectrum.
const SEED_POINTS: usize = 400;

/// Wavenumber range of the built-in seed spectrum in h/Mpc.
const SEED_RANGE: (f64, f64) = (1e-4, 1e4);

/// Complete description of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Cosmological parameters.
    pub cosmology: CosmologicalParameters,
    /// Halo fits.
    pub options: CosmologyOptions,
    /// Galaxy population.
    pub occupation: OccupationParameters,
    /// Pipeline settings.
    pub pipeline: PipelineConfig,
}

/// Resolution and redshift of the halo-model pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Redshift of the galaxy sample.
    pub redshift: f64,
    /// Mass and wavenumber bins of the halo model.
    pub thinness: usize,
    /// Redshift bins of the cosmology tables.
    pub cosmology_thinness: usize,
    /// Two-column seed power spectrum. Relative paths are taken from the
    /// configuration file's directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_spectrum: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            redshift: 1.0,
            thinness: 50,
            cosmology_thinness: 200,
            power_spectrum: None,
        }
    }
}

impl RunConfig {
    /// Loads `path` if given, otherwise the user configuration file if it
    /// exists, otherwise the defaults.
    pub fn resolve(path: Option<&Path>) -> CliResult<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match user_config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Reads and validates a TOML configuration file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| CliError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let mut config = Self::from_toml(&content).map_err(|e| match e {
            CliError::InvalidConfig(reason) => CliError::Config {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;

        if let (Some(spectrum), Some(dir)) = (config.pipeline.power_spectrum.as_mut(), path.parent()) {
            if spectrum.is_relative() {
                *spectrum = dir.join(&*spectrum);
            }
        }

        debug!(path = %path.display(), "loaded run configuration");
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn from_toml(content: &str) -> CliResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| CliError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::InvalidConfig(e.to_string()))
    }

    /// Checks the settings that the libraries treat as caller obligations.
    pub fn validate(&self) -> CliResult<()> {
        self.cosmology
            .validate()
            .map_err(|e| CliError::InvalidConfig(e.to_string()))?;

        let pipeline = &self.pipeline;
        if !(pipeline.redshift > 0.0) {
            return Err(CliError::InvalidConfig(format!(
                "pipeline.redshift must be positive, got {}",
                pipeline.redshift
            )));
        }
        if pipeline.thinness < 2 || pipeline.cosmology_thinness < 2 {
            return Err(CliError::InvalidConfig(
                "pipeline.thinness and pipeline.cosmology_thinness must be at least 2".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the cosmology from the configured or built-in seed spectrum.
    pub fn build_cosmology(&self) -> CliResult<Arc<Cosmology>> {
        let (k, pk) = match &self.pipeline.power_spectrum {
            Some(path) => {
                let table = read_power_spectrum(path).map_err(|e| CliError::Config {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
                info!(path = %path.display(), rows = table.len(), "read seed power spectrum");
                table.into_columns()
            }
            None => bbks_spectrum(&self.cosmology),
        };

        let _span = tracing::info_span!("cosmology", thinness = self.pipeline.cosmology_thinness).entered();
        let cosmology = Cosmology::builder(self.cosmology, k, pk)
            .with_thinness(self.pipeline.cosmology_thinness)
            .with_options(self.options)
            .build()?;
        Ok(Arc::new(cosmology))
    }

    /// Builds the halo model of the configured population.
    pub fn build_halo_model(&self) -> CliResult<HaloModel> {
        let cosmology = self.build_cosmology()?;
        let _span = tracing::info_span!(
            "halo_model",
            occupation = %self.occupation.kind(),
            redshift = self.pipeline.redshift,
            thinness = self.pipeline.thinness,
        )
        .entered();
        let model = HaloModel::new(
            self.occupation.build(),
            cosmology,
            self.pipeline.redshift,
            self.pipeline.thinness,
        )?;
        Ok(model)
    }
}

/// Location of the per-user configuration file.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("halox").join("config.toml"))
}

/// Seed spectrum `k T(k)^2` with the Bardeen et al. (1986) transfer
/// function and shape parameter `Γ = Ω_M h`.
///
/// The amplitude is arbitrary; the cosmology rescales it to σ_8.
pub fn bbks_spectrum(params: &CosmologicalParameters) -> (Vec<f64>, Vec<f64>) {
    let gamma = params.omega_m * params.h;
    let k = log_space(SEED_POINTS, SEED_RANGE.0, SEED_RANGE.1);
    let pk = k
        .iter()
        .map(|&k| {
            let q = k / gamma;
            let transfer = (1.0 + 2.34 * q).ln() / (2.34 * q)
                * (1.0 + 3.89 * q + (16.1 * q).powi(2) + (5.46 * q).powi(3) + (6.71 * q).powi(4)).powf(-0.25);
            k * transfer * transfer
        })
        .collect();
    (k, pk)
}
