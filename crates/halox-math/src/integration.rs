//! Gauss–Kronrod quadrature of scalar functions.
//!
//! Two strategies are provided:
//!
//! - [`integrate_qng`]: non-adaptive, for smooth integrands. The 21-point
//!   Kronrod rule is applied on 1, 2, 4, ... equal panels until the error
//!   estimate meets the requested precision.
//! - [`integrate_qag`]: globally adaptive. The subinterval with the largest
//!   error estimate is bisected until the total error meets the precision
//!   or the subinterval budget is spent.
//!
//! Missing the requested precision is not an error. Both routines log a
//! warning and return the best estimate, so long batch computations degrade
//! instead of aborting.

use log::warn;

/// Default relative precision.
pub const DEFAULT_PRECISION: f64 = 1e-2;

/// Default subinterval budget for the adaptive rule.
pub const DEFAULT_MAX_SUBINTERVALS: usize = 1000;

/// Largest panel count tried by the non-adaptive rule.
const QNG_MAX_PANELS: usize = 64;

/// Kronrod abscissas of the 21-point rule on [-1, 1] (positive half).
/// Odd indices are the 10-point Gauss nodes.
const XGK: [f64; 11] = [
    0.995657163025808080735527280689003,
    0.973906528517171720077964012084452,
    0.930157491355708226001207180059508,
    0.865063366688984510732096688423493,
    0.780817726586416897063717578345042,
    0.679409568299024406234327365114874,
    0.562757134668604683339000099272694,
    0.433395394129247190799265943165784,
    0.294392862701460198131126603103866,
    0.148874338981631210884826001129720,
    0.000000000000000000000000000000000,
];

/// Kronrod weights matching [`XGK`].
const WGK: [f64; 11] = [
    0.011694638867371874278064396062192,
    0.032558162307964727478818972459390,
    0.054755896574351996031381300244580,
    0.075039674810919952767043140916190,
    0.093125454583697605535065465083366,
    0.109387158802297641899210590325805,
    0.123491976262065851077958109831074,
    0.134709217311473325928054001771707,
    0.142775938577060080797094273138717,
    0.147739104901338491374841515972068,
    0.149445554002916905664936468389821,
];

/// Gauss weights for `XGK[1], XGK[3], ..., XGK[9]`.
const WG: [f64; 5] = [
    0.066671344308688137593568809893332,
    0.149451349150580593145776339657697,
    0.219086362515982043995534934228163,
    0.269266719309996355091226921569469,
    0.295524224714752870173892994651338,
];

/// Configuration for the quadrature routines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureConfig {
    /// Requested relative precision.
    pub precision: f64,
    /// Maximum number of subintervals for [`integrate_qag`].
    pub max_subintervals: usize,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            max_subintervals: DEFAULT_MAX_SUBINTERVALS,
        }
    }
}

impl QuadratureConfig {
    /// Sets the requested relative precision.
    #[must_use]
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the subinterval budget.
    #[must_use]
    pub fn with_max_subintervals(mut self, max_subintervals: usize) -> Self {
        self.max_subintervals = max_subintervals;
        self
    }
}

/// Result of a quadrature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrature {
    /// Integral estimate.
    pub value: f64,
    /// Absolute error estimate.
    pub abs_error: f64,
    /// Number of function evaluations.
    pub evaluations: usize,
}

impl Quadrature {
    /// Estimated relative error.
    pub fn relative_error(&self) -> f64 {
        if self.value == 0.0 {
            self.abs_error
        } else {
            self.abs_error / self.value.abs()
        }
    }

    fn meets(&self, precision: f64) -> bool {
        self.abs_error <= precision * self.value.abs()
    }
}

/// 21-point Kronrod estimate on `[a, b]` with the embedded 10-point Gauss
/// estimate as error.
fn gauss_kronrod_21<F>(f: &F, a: f64, b: f64) -> (f64, f64)
where
    F: Fn(f64) -> f64,
{
    let center = 0.5 * (a + b);
    let half = 0.5 * (b - a);

    let f_center = f(center);
    let mut kronrod = WGK[10] * f_center;
    let mut gauss = 0.0;

    for j in 0..10 {
        let dx = half * XGK[j];
        let pair = f(center - dx) + f(center + dx);
        kronrod += WGK[j] * pair;
        if j % 2 == 1 {
            gauss += WG[j / 2] * pair;
        }
    }

    let kronrod = kronrod * half;
    let gauss = gauss * half;
    (kronrod, (kronrod - gauss).abs())
}

fn warn_if_imprecise(routine: &str, result: &Quadrature, precision: f64) {
    if !result.meets(precision) {
        warn!(
            "{routine}: relative error {:.3e} exceeds requested precision {:.1e} (estimate {:.6e})",
            result.relative_error(),
            precision,
            result.value
        );
    }
}

/// Non-adaptive integral of `f` over `[a, b]`.
///
/// # Example
///
/// ```rust
/// use halox_math::integration::{integrate_qng, QuadratureConfig};
///
/// let result = integrate_qng(|x: f64| x.exp(), 0.0, 1.0, &QuadratureConfig::default());
/// assert!((result.value - (1.0_f64.exp() - 1.0)).abs() < 1e-12);
/// ```
pub fn integrate_qng<F>(f: F, a: f64, b: f64, config: &QuadratureConfig) -> Quadrature
where
    F: Fn(f64) -> f64,
{
    let mut panels = 1;
    loop {
        let width = (b - a) / panels as f64;
        let (value, abs_error) = (0..panels)
            .map(|p| {
                let lo = a + width * p as f64;
                let hi = if p + 1 == panels { b } else { lo + width };
                gauss_kronrod_21(&f, lo, hi)
            })
            .fold((0.0, 0.0), |(v, e), (pv, pe)| (v + pv, e + pe));

        let result = Quadrature {
            value,
            abs_error,
            evaluations: 21 * panels,
        };
        if result.meets(config.precision) || panels >= QNG_MAX_PANELS {
            warn_if_imprecise("integrate_qng", &result, config.precision);
            return result;
        }
        panels *= 2;
    }
}

/// Adaptive integral of `f` over `[a, b]`.
///
/// # Example
///
/// ```rust
/// use halox_math::integration::{integrate_qag, QuadratureConfig};
///
/// let config = QuadratureConfig::default().with_precision(1e-8);
/// let result = integrate_qag(|x: f64| x.sqrt(), 0.0, 1.0, &config);
/// assert!((result.value - 2.0 / 3.0).abs() < 1e-8);
/// ```
pub fn integrate_qag<F>(f: F, a: f64, b: f64, config: &QuadratureConfig) -> Quadrature
where
    F: Fn(f64) -> f64,
{
    // (lo, hi, value, error)
    let mut intervals: Vec<(f64, f64, f64, f64)> = Vec::with_capacity(config.max_subintervals);
    let (value, error) = gauss_kronrod_21(&f, a, b);
    intervals.push((a, b, value, error));
    let mut evaluations = 21;

    loop {
        let (value, abs_error) = intervals
            .iter()
            .fold((0.0, 0.0), |(v, e), iv| (v + iv.2, e + iv.3));
        let result = Quadrature {
            value,
            abs_error,
            evaluations,
        };

        if result.meets(config.precision) || intervals.len() >= config.max_subintervals.max(1) {
            warn_if_imprecise("integrate_qag", &result, config.precision);
            return result;
        }

        let worst = intervals
            .iter()
            .enumerate()
            .max_by(|l, r| l.1 .3.total_cmp(&r.1 .3))
            .map_or(0, |(i, _)| i);
        let (lo, hi, _, _) = intervals.swap_remove(worst);
        let mid = 0.5 * (lo + hi);

        let (left_value, left_error) = gauss_kronrod_21(&f, lo, mid);
        let (right_value, right_error) = gauss_kronrod_21(&f, mid, hi);
        evaluations += 42;
        intervals.push((lo, mid, left_value, left_error));
        intervals.push((mid, hi, right_value, right_error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_qng_polynomial_is_exact() {
        let result = integrate_qng(
            |x: f64| 3.0 * x * x + 2.0 * x + 1.0,
            0.0,
            2.0,
            &QuadratureConfig::default(),
        );
        assert_relative_eq!(result.value, 14.0, epsilon = 1e-12);
        assert_eq!(result.evaluations, 21);
    }

    #[test]
    fn test_qng_refines_oscillating_integrand() {
        let config = QuadratureConfig::default().with_precision(1e-10);
        let result = integrate_qng(|x: f64| (10.0 * x).sin(), 0.0, 10.0, &config);
        let exact = (1.0 - 100.0_f64.cos()) / 10.0;
        assert_relative_eq!(result.value, exact, max_relative = 1e-8);
        assert!(result.evaluations > 21);
    }

    #[test]
    fn test_qag_endpoint_singularity() {
        let config = QuadratureConfig::default().with_precision(1e-6);
        let result = integrate_qag(|x: f64| 1.0 / x.sqrt(), 0.0, 1.0, &config);
        assert_relative_eq!(result.value, 2.0, max_relative = 1e-5);
    }

    #[test]
    fn test_qag_peaked_integrand() {
        let config = QuadratureConfig::default().with_precision(1e-9);
        let f = |x: f64| 1.0 / (1e-4 + x * x);
        let result = integrate_qag(f, -1.0, 1.0, &config);
        let exact = 2.0 * 100.0 * (1.0_f64 / 1e-2).atan();
        assert_relative_eq!(result.value, exact, max_relative = 1e-8);
    }

    #[test]
    fn test_budget_exhaustion_returns_estimate() {
        let config = QuadratureConfig::default()
            .with_precision(1e-15)
            .with_max_subintervals(3);
        let result = integrate_qag(|x: f64| 1.0 / x.sqrt(), 0.0, 1.0, &config);
        assert!(result.value.is_finite());
        assert!(result.relative_error() > 1e-15);
    }

    #[test]
    fn test_reversed_limits() {
        let config = QuadratureConfig::default();
        let forward = integrate_qng(|x: f64| x.exp(), 0.0, 1.0, &config);
        let backward = integrate_qng(|x: f64| x.exp(), 1.0, 0.0, &config);
        assert_relative_eq!(forward.value, -backward.value, epsilon = 1e-14);
    }
}
