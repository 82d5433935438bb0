//! Bracketed root finding.
//!
//! [`brent`] solves `f(x) = 0` on a bracket, [`find_root`] solves
//! `f(x) = target`. Convergence uses an interval test on the bracket:
//!
//! ```text
//! |b - a| < abs_tol + rel_tol * min(|a|, |b|)
//! ```
//!
//! where the relative term is dropped when the bracket straddles zero.
//!
//! # Example
//!
//! ```rust
//! use halox_math::solvers::{find_root, SolverConfig};
//!
//! let config = SolverConfig::default().with_tolerance(1e-12).with_relative_tolerance(1e-12);
//! let result = find_root(|x: f64| x * x, 2.0, 0.0, 3.0, &config).unwrap();
//! assert!((result.root - 2.0_f64.sqrt()).abs() < 1e-10);
//! ```

mod brent;

pub use brent::{brent, find_root};

/// Default absolute tolerance on the bracket width.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default relative tolerance on the bracket width.
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 1e-3;

/// Default maximum iterations.
pub const DEFAULT_MAX_ITERATIONS: u32 = 10_000;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Absolute tolerance on the bracket width.
    pub tolerance: f64,
    /// Relative tolerance on the bracket width.
    pub relative_tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            relative_tolerance: DEFAULT_RELATIVE_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, relative_tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            relative_tolerance,
            max_iterations,
        }
    }

    /// Sets the absolute tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the relative tolerance.
    #[must_use]
    pub fn with_relative_tolerance(mut self, relative_tolerance: f64) -> Self {
        self.relative_tolerance = relative_tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Interval convergence test on the bracket `[a, b]`.
    pub fn bracket_converged(&self, a: f64, b: f64) -> bool {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let min_abs = if (lo > 0.0 && hi > 0.0) || (lo < 0.0 && hi < 0.0) {
            lo.abs().min(hi.abs())
        } else {
            0.0
        };
        (hi - lo).abs() < self.tolerance + self.relative_tolerance * min_abs
    }
}

/// Result of a root-finding operation.
#[derive(Debug, Clone, Copy)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Final residual `f(root)`.
    pub residual: f64,
}
