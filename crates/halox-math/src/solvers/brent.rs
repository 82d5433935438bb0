//! Brent's root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Brent's root-finding algorithm.
///
/// Combines the reliability of bisection with the speed of the secant method
/// and inverse quadratic interpolation.
///
/// Requires `f(a)` and `f(b)` of opposite sign (or one of them zero).
///
/// # Errors
///
/// [`MathError::InvalidBracket`] if the root is not bracketed and
/// [`MathError::ConvergenceFailed`] if the bracket test is not met within
/// `config.max_iterations`.
///
/// # Example
///
/// ```rust
/// use halox_math::solvers::{brent, SolverConfig};
///
/// let f = |x: f64| x * x * x - x - 2.0;
/// let config = SolverConfig::default().with_tolerance(1e-12).with_relative_tolerance(0.0);
///
/// let result = brent(f, 1.0, 2.0, &config).unwrap();
/// assert!(f(result.root).abs() < 1e-10);
/// ```
#[allow(clippy::many_single_char_names)]
pub fn brent<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut a = a;
    let mut b = b;
    let mut fa = f(a);
    let mut fb = f(b);

    if fa.is_nan() || fb.is_nan() || fa * fb > 0.0 {
        return Err(MathError::InvalidBracket { a, b, fa, fb });
    }

    // Keep |f(b)| <= |f(a)|, b is the best estimate
    if fa.abs() < fb.abs() {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut fa, &mut fb);
    }

    let mut c = a;
    let mut fc = fa;
    let mut d = b - a;
    let mut e = d;

    for iteration in 0..config.max_iterations {
        if fb == 0.0 || config.bracket_converged(a, b) {
            return Ok(SolverResult {
                root: b,
                iterations: iteration,
                residual: fb,
            });
        }

        let m = 0.5 * (a + b);

        let s_trial = if (fa - fc).abs() > 1e-15 && (fb - fc).abs() > 1e-15 {
            // Inverse quadratic interpolation
            let r = fb / fc;
            let p_val = fa / fc;
            let q = fa / fb;

            b - (q * (q - r) * (b - a) + (1.0 - r) * (b - c) * p_val)
                / ((q - 1.0) * (r - 1.0) * (p_val - 1.0))
        } else if (fb - fa).abs() > 1e-15 {
            // Secant step
            b - fb * (b - a) / (fb - fa)
        } else {
            m
        };

        let use_bisection =
            !(s_trial > m.min(b) && s_trial < m.max(b) && (s_trial - b).abs() < 0.5 * e.abs());

        let s;
        if use_bisection {
            s = m;
            e = b - a;
            d = e;
        } else {
            // Never step by less than half the tolerance, so the far end
            // of the bracket keeps moving
            let min_step = 0.5 * (config.tolerance + config.relative_tolerance * b.abs());
            s = if (s_trial - b).abs() < min_step {
                b + min_step.copysign(m - b)
            } else {
                s_trial
            };
            e = d;
            d = s - b;
        }

        c = b;
        fc = fb;

        let fs = f(s);
        if fs.is_nan() {
            return Err(MathError::convergence_failed(iteration + 1, fs));
        }

        if fa * fs < 0.0 {
            b = s;
            fb = fs;
        } else {
            a = s;
            fa = fs;
        }

        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }
    }

    Err(MathError::convergence_failed(
        config.max_iterations,
        fb.abs(),
    ))
}

/// Solves `f(x) = target` for `x` in `[low, high]` with [`brent`].
///
/// # Errors
///
/// Same as [`brent`], applied to `f(x) - target`.
pub fn find_root<F>(
    f: F,
    target: f64,
    low: f64,
    high: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    brent(|x| f(x) - target, low, high, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tight() -> SolverConfig {
        SolverConfig::default()
            .with_tolerance(1e-13)
            .with_relative_tolerance(0.0)
            .with_max_iterations(200)
    }

    #[test]
    fn test_sqrt_2() {
        let result = brent(|x: f64| x * x - 2.0, 1.0, 2.0, &tight()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_cubic() {
        // x^3 - x - 2 has a root near 1.52
        let f = |x: f64| x * x * x - x - 2.0;
        let result = brent(f, 1.0, 2.0, &tight()).unwrap();

        assert!(f(result.root).abs() < 1e-10);
        assert_relative_eq!(result.root, 1.521_379_706_804_568, epsilon = 1e-10);
    }

    #[test]
    fn test_sin() {
        let result = brent(|x: f64| x.sin(), 3.0, 4.0, &tight()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::PI, epsilon = 1e-10);
    }

    #[test]
    fn test_default_tolerances_are_loose() {
        // Root at 1000, relative tolerance 1e-3 allows a bracket of width ~1
        let result = find_root(|x: f64| x, 1000.0, 0.0, 5000.0, &SolverConfig::default()).unwrap();
        assert!((result.root - 1000.0).abs() < 1.0);
    }

    #[test]
    fn test_find_root_target() {
        let result = find_root(|x: f64| x.exp(), 10.0, 0.0, 5.0, &tight()).unwrap();
        assert_relative_eq!(result.root, 10.0_f64.ln(), epsilon = 1e-10);
    }

    #[test]
    fn test_invalid_bracket() {
        let result = brent(|x: f64| x * x - 2.0, 2.0, 3.0, &SolverConfig::default());
        assert!(matches!(result, Err(MathError::InvalidBracket { .. })));
        assert!(result.unwrap_err().is_numeric_failure());
    }

    #[test]
    fn test_iteration_budget() {
        let config = tight().with_max_iterations(2);
        let result = brent(|x: f64| x.powi(3) - 0.3, 0.0, 10.0, &config);
        assert!(matches!(result, Err(MathError::ConvergenceFailed { .. })));
    }

    #[test]
    fn test_root_at_endpoint() {
        let result = brent(|x: f64| x - 1.0, 1.0, 2.0, &tight()).unwrap();
        assert_eq!(result.root, 1.0);
        assert_eq!(result.iterations, 0);
    }
}
