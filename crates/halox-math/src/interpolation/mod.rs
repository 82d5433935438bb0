//! Tabulated functions on linear and logarithmic grids.
//!
//! Every table is a natural cubic spline over a fixed grid. Two grid
//! strategies are available:
//!
//! - [`LinearInterpolator`]: spline of `f(x)` against `x`
//! - [`LogInterpolator`]: spline of `x f(x)` against `ln x`
//!
//! The log strategy makes the spline integral over `ln x` equal to the
//! integral of `f` over `x`, which keeps integrals of steep power-law-like
//! functions (power spectra, mass functions) accurate on coarse grids.
//!
//! Tables with the same strategy and size are closed under pointwise
//! addition and multiplication. Integrands are built by composing tables
//! and integrating the product, never by re-evaluating the factors.
//!
//! # Example
//!
//! ```rust
//! use halox_math::interpolation::{Interpolator, LogInterpolator};
//!
//! let n_of_m = LogInterpolator::from_fn(|m| m.powf(-1.9), 1e10, 1e15, 50).unwrap();
//! let m_of_m = LogInterpolator::from_fn(|m| m, 1e10, 1e15, 50).unwrap();
//! let integrand = n_of_m.multiply(&m_of_m).unwrap();
//! assert!(integrand.integrate(1e10, 1e15) > 0.0);
//! ```

mod scale;
mod spline;
mod table;

pub use scale::{GridScale, Linear, Logarithmic};
pub use spline::CubicSpline;
pub use table::{LinearInterpolator, LogInterpolator, TabulatedFunction};

/// Capability interface of a tabulated function.
///
/// Queries outside `[min_x, max_x]` extrapolate and are not guarded.
pub trait Interpolator: Send + Sync {
    /// Interpolated value at `x`.
    fn evaluate(&self, x: f64) -> f64;

    /// Definite integral over `[a, b]`.
    fn integrate(&self, a: f64, b: f64) -> f64;

    /// Smallest tabulated abscissa.
    fn min_x(&self) -> f64;

    /// Largest tabulated abscissa.
    fn max_x(&self) -> f64;

    /// Checks if x is within the tabulated range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }

    /// Evaluates the table at every point of `xs`.
    fn evaluate_all(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }
}
