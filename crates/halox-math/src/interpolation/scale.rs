//! Grid strategies for tabulated functions.
//!
//! A strategy decides which variable the spline runs over and which values
//! are splined. The linear strategy splines `f` against `x`. The logarithmic
//! strategy splines `x f(x)` against `ln x`, so that the spline integral over
//! `ln x` is directly the integral of `f` over `x`.

use std::fmt::Debug;

use crate::error::{MathError, MathResult};
use crate::grid::lin_space;

/// How a tabulated function maps onto its spline.
pub trait GridScale: Debug + Clone + Copy + Default + Send + Sync + 'static {
    /// Short name used in diagnostics.
    const NAME: &'static str;

    /// Maps an abscissa onto the spline variable.
    fn to_knot(x: f64) -> f64;

    /// Maps a spline variable back onto the abscissa.
    fn from_knot(u: f64) -> f64;

    /// Value stored in the spline for `f` at `x`.
    fn weight(x: f64, f: f64) -> f64;

    /// Recovers `f` at `x` from a spline value.
    fn unweight(x: f64, g: f64) -> f64;

    /// Checks that an abscissa is admissible for this grid.
    fn check_abscissa(x: f64) -> MathResult<()>;

    /// Spline knots for `n` samples on `[min, max]`.
    ///
    /// Knots are evenly spaced in the spline variable.
    fn sample_knots(n: usize, min: f64, max: f64) -> Vec<f64> {
        lin_space(n, Self::to_knot(min), Self::to_knot(max))
    }
}

/// Evenly spaced abscissas, spline over `f(x)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Linear;

impl GridScale for Linear {
    const NAME: &'static str = "linear";

    #[inline]
    fn to_knot(x: f64) -> f64 {
        x
    }

    #[inline]
    fn from_knot(u: f64) -> f64 {
        u
    }

    #[inline]
    fn weight(_x: f64, f: f64) -> f64 {
        f
    }

    #[inline]
    fn unweight(_x: f64, g: f64) -> f64 {
        g
    }

    fn check_abscissa(x: f64) -> MathResult<()> {
        if x.is_finite() {
            Ok(())
        } else {
            Err(MathError::invalid_input(format!(
                "abscissa {x} is not finite"
            )))
        }
    }
}

/// Log-spaced abscissas, spline over `x f(x)` against `ln x`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Logarithmic;

impl GridScale for Logarithmic {
    const NAME: &'static str = "logarithmic";

    #[inline]
    fn to_knot(x: f64) -> f64 {
        x.ln()
    }

    #[inline]
    fn from_knot(u: f64) -> f64 {
        u.exp()
    }

    #[inline]
    fn weight(x: f64, f: f64) -> f64 {
        x * f
    }

    #[inline]
    fn unweight(x: f64, g: f64) -> f64 {
        g / x
    }

    fn check_abscissa(x: f64) -> MathResult<()> {
        if x > 0.0 && x.is_finite() {
            Ok(())
        } else {
            Err(MathError::invalid_input(format!(
                "log-grid abscissa must be positive and finite, got {x}"
            )))
        }
    }
}
