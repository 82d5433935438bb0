//! # Halox Model
//!
//! Halo occupation models and halo-model galaxy clustering.
//!
//! This crate provides:
//!
//! - **Occupation**: Mean central and satellite counts per halo
//! - **Halo model**: One- and two-halo power spectra of a galaxy population
//! - **Cross halo model**: The same decomposition for two populations
//! - **Real space**: Correlation, projected and angular statistics via FFTLog
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use halox_cosmology::{CosmologicalParameters, Cosmology};
//! use halox_math::grid::log_space;
//! use halox_model::prelude::*;
//!
//! let k = log_space(200, 1e-4, 1e4);
//! let pk: Vec<f64> = k.iter().map(|&k| k / (1.0 + (k / 0.02).powi(2)).powi(2)).collect();
//! let cosmology = Arc::new(
//!     Cosmology::builder(CosmologicalParameters::default(), k, pk)
//!         .build()
//!         .unwrap(),
//! );
//!
//! let hod = OccupationParameters::default().build();
//! let model = HaloModel::new(hod, cosmology, 1.0, 50).unwrap();
//!
//! let pk = model.power_spectrum(Component::Total).unwrap();
//! let xi = model
//!     .correlation_function(Component::Total, &log_space(20, 0.1, 50.0))
//!     .unwrap();
//! assert_eq!(pk.len(), 50);
//! assert_eq!(xi.len(), 20);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]
#![allow(clippy::float_cmp)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]
#![allow(clippy::uninlined_format_args)]

pub mod component;
pub mod cross_halo_model;
pub mod error;
pub mod halo_model;
pub mod occupation;
pub mod parallel;
pub mod tables;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::component::Component;
    pub use crate::cross_halo_model::CrossHaloModel;
    pub use crate::error::{ModelError, ModelResult};
    pub use crate::halo_model::HaloModel;
    pub use crate::occupation::{
        Harikane16, OccupationKind, OccupationModel, OccupationParameters, Tinker10,
    };
}

pub use component::Component;
pub use cross_halo_model::CrossHaloModel;
pub use error::{ModelError, ModelResult};
pub use halo_model::HaloModel;
pub use occupation::{Harikane16, OccupationKind, OccupationModel, OccupationParameters, Tinker10};
