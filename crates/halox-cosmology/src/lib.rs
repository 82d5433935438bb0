//! # Halox Cosmology
//!
//! Background cosmology and halo statistics for the Halox halo-model library.
//!
//! This crate provides:
//!
//! - **Background**: Expansion rate, distances, volumes, cosmic time, densities
//! - **Growth**: Linear growth factor, linear power spectrum, smoothed variance
//! - **Halos**: Mass functions, bias, concentration, NFW profile, formation redshift
//! - **Luminosity functions**: UV parameterisations selectable by name
//! - **I/O**: Reader for tabulated seed power spectra
//!
//! ## Example
//!
//! ```rust
//! use halox_cosmology::prelude::*;
//! use halox_math::grid::log_space;
//!
//! let k = log_space(200, 1e-4, 1e4);
//! let pk: Vec<f64> = k.iter().map(|&k| k / (1.0 + (k / 0.2).powi(2)).powi(2)).collect();
//!
//! let cosmo = Cosmology::builder(CosmologicalParameters::default(), k, pk)
//!     .with_thinness(200)
//!     .build()
//!     .unwrap();
//!
//! let sigma8 = cosmo.sigma2_radius_comoving(8.0, cosmo.z_min()).sqrt();
//! assert!((sigma8 - 0.8).abs() < 1e-6);
//! ```
//!
//! Redshifts passed to queries must lie within the tabulated
//! `[z_min, z_max]` range, masses and radii must be positive. These are
//! caller obligations and are not checked.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]
#![allow(clippy::float_cmp)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::similar_names)]
#![allow(clippy::uninlined_format_args)]

pub mod background;
pub mod constants;
pub mod error;
pub mod growth;
pub mod halos;
pub mod io;
pub mod luminosity;
pub mod parameters;
pub mod survey;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::background::{Cosmology, CosmologyBuilder};
    pub use crate::error::{CosmologyError, CosmologyResult};
    pub use crate::io::{read_power_spectrum, PowerSpectrumTable};
    pub use crate::luminosity::LuminosityFunction;
    pub use crate::parameters::{
        ConcentrationModel, CosmologicalParameters, CosmologyOptions, HaloBiasModel,
        MassFunctionModel, OverdensityModel,
    };
}

pub use background::{Cosmology, CosmologyBuilder};
pub use error::{CosmologyError, CosmologyResult};
pub use luminosity::LuminosityFunction;
pub use parameters::{
    ConcentrationModel, CosmologicalParameters, CosmologyOptions, HaloBiasModel,
    MassFunctionModel, OverdensityModel,
};
