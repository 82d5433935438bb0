//! Special functions.
//!
//! - Spherical top-hat window in Fourier space and its derivative
//! - Sine and cosine integrals `Si`, `Ci`
//! - Complex log-gamma

use std::f64::consts::{FRAC_PI_2, PI};

use num_complex::Complex64;

/// Euler–Mascheroni constant.
pub const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Below this argument the window functions switch to their Taylor series.
const WINDOW_SERIES_LIMIT: f64 = 1e-2;

/// Fourier transform of a unit spherical top-hat, `3 (sin x - x cos x) / x^3`.
///
/// Equals 1 at `x = 0`.
pub fn top_hat_window(x: f64) -> f64 {
    if x.abs() < WINDOW_SERIES_LIMIT {
        let x2 = x * x;
        return 1.0 - x2 / 10.0 + x2 * x2 / 280.0;
    }
    3.0 * (x.sin() - x * x.cos()) / (x * x * x)
}

/// Derivative of [`top_hat_window`], `(3 (x^2 - 3) sin x + 9 x cos x) / x^4`.
pub fn top_hat_window_derivative(x: f64) -> f64 {
    if x.abs() < WINDOW_SERIES_LIMIT {
        return -x / 5.0 + x * x * x / 70.0;
    }
    let x2 = x * x;
    (3.0 * (x2 - 3.0) * x.sin() + 9.0 * x * x.cos()) / (x2 * x2)
}

/// Sine and cosine integrals `(Si(x), Ci(x))`.
///
/// Power series below `|x| = 2`, Lentz continued fraction for the complex
/// exponential integral above. `Ci` is evaluated at `|x|`; `Ci(0)` is
/// negative infinity.
pub fn sine_cosine_integrals(x: f64) -> (f64, f64) {
    const MAX_ITERATIONS: usize = 100;
    const SWITCH: f64 = 2.0;
    const TINY: f64 = 1e-300;

    let t = x.abs();
    if t == 0.0 {
        return (0.0, f64::NEG_INFINITY);
    }

    let (si, ci) = if t > SWITCH {
        // E1(i t) by continued fraction, modified Lentz
        let mut b = Complex64::new(1.0, t);
        let mut c = Complex64::new(1.0 / TINY, 0.0);
        let mut d = b.inv();
        let mut h = d;
        for i in 2..MAX_ITERATIONS {
            let a = -(((i - 1) * (i - 1)) as f64);
            b += Complex64::new(2.0, 0.0);
            d = (d * a + b).inv();
            c = b + c.inv() * a;
            let del = c * d;
            h *= del;
            if (del.re - 1.0).abs() + del.im.abs() < f64::EPSILON {
                break;
            }
        }
        h *= Complex64::new(t.cos(), -t.sin());
        (FRAC_PI_2 + h.im, -h.re)
    } else if t < TINY.sqrt() {
        (t, t.ln() + EULER_GAMMA)
    } else {
        let mut sum = 0.0;
        let mut sums = 0.0;
        let mut sumc = 0.0;
        let mut sign = 1.0;
        let mut fact = 1.0;
        let mut odd = true;
        for k in 1..=MAX_ITERATIONS {
            let kf = k as f64;
            fact *= t / kf;
            let term = fact / kf;
            sum += sign * term;
            let err = term / sum.abs();
            if odd {
                sign = -sign;
                sums = sum;
                sum = sumc;
            } else {
                sumc = sum;
                sum = sums;
            }
            if err < f64::EPSILON {
                break;
            }
            odd = !odd;
        }
        (sums, sumc + t.ln() + EULER_GAMMA)
    };

    if x < 0.0 {
        (-si, ci)
    } else {
        (si, ci)
    }
}

/// Sine integral `Si(x)`.
pub fn sine_integral(x: f64) -> f64 {
    sine_cosine_integrals(x).0
}

/// Cosine integral `Ci(x)` for `x > 0`.
pub fn cosine_integral(x: f64) -> f64 {
    sine_cosine_integrals(x).1
}

/// Natural log of the gamma function for complex argument.
///
/// Lanczos approximation (g = 7) with reflection for `Re z < 1/2`. The
/// imaginary part is determined modulo `2 pi`.
pub fn ln_gamma(z: Complex64) -> Complex64 {
    const G: f64 = 7.0;
    const COEFFICIENTS: [f64; 9] = [
        0.999_999_999_999_809_93,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_13,
        -176.615_029_162_140_59,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_571_6e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if z.re < 0.5 {
        // Gamma(z) Gamma(1 - z) = pi / sin(pi z)
        let pi = Complex64::new(PI, 0.0);
        return pi.ln() - (z * PI).sin().ln() - ln_gamma(Complex64::new(1.0, 0.0) - z);
    }

    let z = z - 1.0;
    let mut series = Complex64::new(COEFFICIENTS[0], 0.0);
    for (i, &c) in COEFFICIENTS.iter().enumerate().skip(1) {
        series += c / (z + i as f64);
    }
    let t = z + G + 0.5;
    0.5 * (2.0 * PI).ln() + (z + 0.5) * t.ln() - t + series.ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ============ Window ============

    #[test]
    fn test_window_limits() {
        assert_eq!(top_hat_window(0.0), 1.0);
        assert_eq!(top_hat_window_derivative(0.0), 0.0);
        // First zero of tan x = x
        assert!(top_hat_window(4.493_409_457_909_064).abs() < 1e-12);
    }

    #[test]
    fn test_window_series_matches_closed_form() {
        for &x in &[0.0099, 0.0101, 0.05] {
            let closed = 3.0 * (f64::sin(x) - x * f64::cos(x)) / (x * x * x);
            assert_relative_eq!(top_hat_window(x), closed, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_window_derivative_matches_finite_difference() {
        for &x in &[0.005, 0.3, 1.0, 2.5, 7.0, 20.0] {
            let h = 1e-6;
            let numeric = (top_hat_window(x + h) - top_hat_window(x - h)) / (2.0 * h);
            assert_relative_eq!(
                top_hat_window_derivative(x),
                numeric,
                epsilon = 1e-8,
                max_relative = 1e-5
            );
        }
    }

    // ============ Si / Ci ============

    #[test]
    fn test_sine_cosine_integral_reference_values() {
        // Abramowitz & Stegun table 5.1
        assert_relative_eq!(sine_integral(1.0), 0.946_083_070_367_183, epsilon = 1e-13);
        assert_relative_eq!(cosine_integral(1.0), 0.337_403_922_900_968, epsilon = 1e-13);
        assert_relative_eq!(sine_integral(5.0), 1.549_931_244_944_674, epsilon = 1e-13);
        assert_relative_eq!(cosine_integral(5.0), -0.190_029_749_656_644, epsilon = 1e-13);
        assert_relative_eq!(sine_integral(10.0), 1.658_347_594_218_874, epsilon = 1e-13);
        assert_relative_eq!(cosine_integral(10.0), -0.045_456_433_004_455, epsilon = 1e-13);
    }

    #[test]
    fn test_sine_integral_is_odd_and_saturates() {
        assert_relative_eq!(sine_integral(-3.0), -sine_integral(3.0));
        assert_relative_eq!(sine_integral(1e4), FRAC_PI_2, epsilon = 2e-4);
        assert!(cosine_integral(1e4).abs() < 2e-4);
    }

    #[test]
    fn test_small_argument_behaviour() {
        let x = 1e-6;
        assert_relative_eq!(sine_integral(x), x, max_relative = 1e-12);
        assert_relative_eq!(cosine_integral(x), x.ln() + EULER_GAMMA, max_relative = 1e-12);
        assert_eq!(cosine_integral(0.0), f64::NEG_INFINITY);
    }

    #[test]
    fn test_branches_agree_at_switch() {
        let below = sine_cosine_integrals(2.0 - 1e-12);
        let above = sine_cosine_integrals(2.0 + 1e-12);
        assert_relative_eq!(below.0, above.0, epsilon = 1e-10);
        assert_relative_eq!(below.1, above.1, epsilon = 1e-10);
    }

    // ============ Log-gamma ============

    #[test]
    fn test_ln_gamma_real_values() {
        assert!(ln_gamma(Complex64::new(1.0, 0.0)).norm() < 1e-13);
        assert!(ln_gamma(Complex64::new(2.0, 0.0)).norm() < 1e-13);
        assert_relative_eq!(
            ln_gamma(Complex64::new(0.5, 0.0)).re,
            0.5 * PI.ln(),
            epsilon = 1e-13
        );
        assert_relative_eq!(
            ln_gamma(Complex64::new(10.0, 0.0)).re,
            362_880.0_f64.ln(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_ln_gamma_modulus_on_critical_line() {
        // |Gamma(1/2 + i y)|^2 = pi / cosh(pi y)
        for &y in &[0.3, 2.0, 15.0, 40.0] {
            let value = ln_gamma(Complex64::new(0.5, y));
            let expected = 0.5 * (PI.ln() - (PI * y).cosh().ln());
            assert_relative_eq!(value.re, expected, epsilon = 1e-10, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_ln_gamma_reflection() {
        // Gamma(-1/2) = -2 sqrt(pi)
        let value = ln_gamma(Complex64::new(-0.5, 0.0)).exp();
        assert_relative_eq!(value.re, -2.0 * PI.sqrt(), epsilon = 1e-12);
        assert!(value.im.abs() < 1e-12);
    }
}
