//! # Halox Math
//!
//! Numerical substrate for the Halox halo-model library.
//!
//! This crate provides:
//!
//! - **Grids**: Reproducible linear and logarithmic sampling
//! - **Interpolation**: Natural cubic splines on linear and log grids, closed
//!   under pointwise addition and multiplication, with analytic integrals
//! - **Integration**: Gauss–Kronrod quadrature, non-adaptive and adaptive
//! - **Solvers**: Bracketed root finding (Brent)
//! - **Special functions**: Top-hat window, sine/cosine integrals, complex log-gamma
//! - **FFTLog**: Hankel transforms between power spectra and correlation functions
//!
//! ## Design Philosophy
//!
//! - **Tabulate once**: Derived quantities are sampled into tables and then
//!   composed and integrated as tables
//! - **Degrade, don't abort**: Quadrature precision misses are logged, not raised
//! - **Caller-checked domains**: Hot-path evaluation does not range-check

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod fftlog;
pub mod grid;
pub mod integration;
pub mod interpolation;
pub mod solvers;
pub mod special;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::fftlog::{
        CorrelationTransform, FftLog, HankelKernel, Isotropic3D, Projected2D, ProjectedTransform,
    };
    pub use crate::grid::{lin_space, log_space};
    pub use crate::integration::{integrate_qag, integrate_qng, Quadrature, QuadratureConfig};
    pub use crate::interpolation::{
        Interpolator, LinearInterpolator, LogInterpolator, TabulatedFunction,
    };
    pub use crate::solvers::{brent, find_root, SolverConfig, SolverResult};
}

pub use error::{MathError, MathResult};
