//! Log-spaced Hankel transforms between power spectra and correlation
//! functions.
//!
//! An [`FftLog`] takes a function tabulated on an arbitrary increasing
//! grid, resamples it onto a uniform logarithmic grid centred on the input
//! range, runs a discrete Hankel transform and returns the result as a
//! [`LogInterpolator`] over the conjugate variable.
//!
//! The kernel fixes the Bessel order and the scale factors:
//!
//! | Kernel | Order | Computes |
//! |--------|-------|----------|
//! | [`Isotropic3D`] | 1/2 | `ξ(r) = 1/(2π²) ∫ P(k) k² j0(kr) dk` |
//! | [`Projected2D`] | 0 | `w(r) = 1/(2π) ∫ P(k) k J0(kr) dk` |

mod hankel;

use std::f64::consts::PI;
use std::fmt::Debug;
use std::marker::PhantomData;

use log::debug;

use crate::error::{MathError, MathResult};
use crate::grid::geometric_center;
use crate::interpolation::{Interpolator, LogInterpolator};

pub use hankel::{low_ringing_kr, HankelPlan};

/// Bessel order and scaling of a Hankel transform.
pub trait HankelKernel: Debug + Clone + Copy + Default + Send + Sync + 'static {
    /// Short name for diagnostics.
    const NAME: &'static str;

    /// Bessel function order `mu`.
    const ORDER: f64;

    /// Maps an input sample `f(x)` to the transform input at `x`.
    fn pre_scale(x: f64, f: f64) -> f64;

    /// Maps a raw transform output at `k` to the physical result.
    fn post_scale(k: f64, value: f64) -> f64;
}

/// Three-dimensional isotropic Fourier transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct Isotropic3D;

impl HankelKernel for Isotropic3D {
    const NAME: &'static str = "isotropic-3d";
    const ORDER: f64 = 0.5;

    fn pre_scale(x: f64, f: f64) -> f64 {
        0.5 / (PI * PI) * (0.5 * PI).sqrt() * f * x.powf(1.5)
    }

    fn post_scale(k: f64, value: f64) -> f64 {
        value / k.powf(1.5)
    }
}

/// Two-dimensional (projected) Fourier transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct Projected2D;

impl HankelKernel for Projected2D {
    const NAME: &'static str = "projected-2d";
    const ORDER: f64 = 0.0;

    fn pre_scale(x: f64, f: f64) -> f64 {
        f * x / (2.0 * PI)
    }

    fn post_scale(k: f64, value: f64) -> f64 {
        value / k
    }
}

/// Power spectrum to three-dimensional correlation function.
pub type CorrelationTransform = FftLog<Isotropic3D>;

/// Power spectrum to projected correlation function.
pub type ProjectedTransform = FftLog<Projected2D>;

/// A Hankel transform of one tabulated function.
///
/// Construction only validates and tabulates the input. The transform runs
/// on the first call to [`FftLog::transform`] and is kept afterwards.
///
/// # Example
///
/// ```rust
/// use halox_math::fftlog::ProjectedTransform;
/// use halox_math::grid::log_space;
///
/// let ks = log_space(256, 1e-4, 1e2);
/// let ps: Vec<f64> = ks.iter().map(|k| (-0.5 * k * k).exp()).collect();
///
/// let mut transform = ProjectedTransform::new(ks, ps).unwrap();
/// let w = transform.transform_at(&[1.0]).unwrap();
/// assert!((w[0] - (-0.5_f64).exp() / (2.0 * std::f64::consts::PI)).abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct FftLog<K: HankelKernel> {
    input: LogInterpolator,
    kr: f64,
    result: Option<LogInterpolator>,
    kernel: PhantomData<K>,
}

impl<K: HankelKernel> FftLog<K> {
    /// Transform of the samples `(xs, fs)` with `kr = 1`.
    ///
    /// # Errors
    ///
    /// Returns an error if the samples do not form a valid log-grid table.
    pub fn new(xs: Vec<f64>, fs: Vec<f64>) -> MathResult<Self> {
        Self::with_kr(xs, fs, 1.0)
    }

    /// Transform of the samples `(xs, fs)` with the given `kr`.
    ///
    /// `kr` is the product of the central input and output abscissas
    /// before the low-ringing adjustment.
    ///
    /// # Errors
    ///
    /// Returns an error if the samples do not form a valid log-grid table
    /// or `kr` is not positive.
    pub fn with_kr(xs: Vec<f64>, fs: Vec<f64>, kr: f64) -> MathResult<Self> {
        let input = LogInterpolator::from_samples(xs, fs)?;
        Self::from_interpolator(input, kr)
    }

    /// Transform of an existing table.
    ///
    /// # Errors
    ///
    /// Returns an error if `kr` is not positive.
    pub fn from_interpolator(input: LogInterpolator, kr: f64) -> MathResult<Self> {
        if !(kr > 0.0) {
            return Err(MathError::invalid_input(format!("kr must be positive, got {kr}")));
        }
        Ok(Self {
            input,
            kr,
            result: None,
            kernel: PhantomData,
        })
    }

    /// The requested `kr`.
    pub fn kr(&self) -> f64 {
        self.kr
    }

    /// The transformed table, if [`FftLog::transform`] has run.
    pub fn result(&self) -> Option<&LogInterpolator> {
        self.result.as_ref()
    }

    /// Runs the transform once and returns the result table.
    ///
    /// # Errors
    ///
    /// Returns an error if the Hankel plan cannot be built or the output
    /// grid is degenerate.
    pub fn transform(&mut self) -> MathResult<&LogInterpolator> {
        let result = match self.result.take() {
            Some(result) => result,
            None => self.compute()?,
        };
        Ok(self.result.insert(result))
    }

    /// Runs the transform if needed and evaluates the result at `points`.
    ///
    /// # Errors
    ///
    /// Same as [`FftLog::transform`].
    pub fn transform_at(&mut self, points: &[f64]) -> MathResult<Vec<f64>> {
        Ok(self.transform()?.evaluate_all(points))
    }

    fn compute(&self) -> MathResult<LogInterpolator> {
        let xs = self.input.x_values();
        let n = xs.len();
        let x_first = xs[0];
        let x_last = xs[n - 1];

        let dlnx = (x_last / x_first).ln() / (n + 1) as f64;
        let lnx_center = geometric_center(xs).ln();
        let offset = |j: usize| (j as f64 - 0.5 * (n - 1) as f64) * dlnx;

        let plan = HankelPlan::new(n, K::ORDER, dlnx, self.kr, true)?;
        let lnk_center = plan.kr().ln() - lnx_center;

        debug!(
            "FFTLog {}: {} points, dlnx = {:.4e}, kr = {:.6e} (requested {:.6e})",
            K::NAME,
            n,
            dlnx,
            plan.kr(),
            self.kr
        );

        let input: Vec<f64> = (0..n)
            .map(|j| {
                let x = (lnx_center + offset(j)).exp();
                K::pre_scale(x, self.input.evaluate(x))
            })
            .collect();

        let output = plan.transform(&input)?;

        let ks: Vec<f64> = (0..n).map(|j| (lnk_center + offset(j)).exp()).collect();
        let fk: Vec<f64> = ks
            .iter()
            .zip(&output)
            .map(|(&k, &value)| K::post_scale(k, value))
            .collect();

        LogInterpolator::from_samples(ks, fk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::log_space;
    use approx::assert_relative_eq;

    fn gaussian_spectrum(n: usize) -> (Vec<f64>, Vec<f64>) {
        let ks = log_space(n, 1e-5, 1e2);
        let ps = ks.iter().map(|k| (-0.5 * k * k).exp()).collect();
        (ks, ps)
    }

    #[test]
    fn test_isotropic_gaussian() {
        // xi(r) = exp(-r^2/2) / (2 pi)^{3/2}
        let (ks, ps) = gaussian_spectrum(512);
        let mut transform = CorrelationTransform::new(ks, ps).unwrap();

        let rs = [0.5, 1.0, 1.5];
        let xi = transform.transform_at(&rs).unwrap();
        for (r, value) in rs.iter().zip(&xi) {
            let exact = (-0.5 * r * r).exp() / (2.0 * PI).powf(1.5);
            assert_relative_eq!(*value, exact, max_relative = 1e-3);
        }
    }

    #[test]
    fn test_projected_gaussian() {
        // w(r) = exp(-r^2/2) / (2 pi)
        let (ks, ps) = gaussian_spectrum(512);
        let mut transform = ProjectedTransform::new(ks, ps).unwrap();

        let rs = [0.5, 1.0, 1.5];
        let w = transform.transform_at(&rs).unwrap();
        for (r, value) in rs.iter().zip(&w) {
            let exact = (-0.5 * r * r).exp() / (2.0 * PI);
            assert_relative_eq!(*value, exact, max_relative = 1e-3);
        }
    }

    #[test]
    fn test_non_uniform_input_is_resampled() {
        let (uniform_k, uniform_p) = gaussian_spectrum(600);
        // Thin the grid unevenly
        let (ks, ps): (Vec<f64>, Vec<f64>) = uniform_k
            .into_iter()
            .zip(uniform_p)
            .enumerate()
            .filter(|(i, _)| i % 3 != 1)
            .map(|(_, pair)| pair)
            .unzip();

        let mut transform = ProjectedTransform::new(ks, ps).unwrap();
        let w = transform.transform_at(&[1.0]).unwrap();
        assert_relative_eq!(w[0], (-0.5_f64).exp() / (2.0 * PI), max_relative = 2e-3);
    }

    #[test]
    fn test_output_grid_is_conjugate() {
        let (ks, ps) = gaussian_spectrum(128);
        let (k_first, k_last) = (ks[0], ks[127]);
        let mut transform = CorrelationTransform::with_kr(ks, ps, 2.0).unwrap();
        let result = transform.transform().unwrap();

        assert_eq!(result.len(), 128);
        let rs = result.x_values();
        let dlnk = (k_last / k_first).ln() / 129.0;
        let dlnr = (rs[1] / rs[0]).ln();
        assert_relative_eq!(dlnr, dlnk, max_relative = 1e-10);

        // Central abscissas multiply to the adjusted kr, within half a step of 2
        let r_mid = (rs[0] * rs[127]).sqrt();
        let k_mid = (k_first * k_last).sqrt();
        assert!(((r_mid * k_mid) / 2.0).ln().abs() <= 0.5 * dlnk + 1e-9);
    }

    #[test]
    fn test_transform_runs_once() {
        let (ks, ps) = gaussian_spectrum(64);
        let mut transform = ProjectedTransform::new(ks, ps).unwrap();
        assert!(transform.result().is_none());

        let first = transform.transform().unwrap().f_values().to_vec();
        let second = transform.transform().unwrap().f_values().to_vec();
        assert_eq!(first, second);
        assert!(transform.result().is_some());
    }

    #[test]
    fn test_invalid_input() {
        assert!(ProjectedTransform::new(vec![1.0], vec![1.0]).is_err());
        assert!(ProjectedTransform::new(vec![0.0, 1.0], vec![1.0, 1.0]).is_err());
        assert!(CorrelationTransform::with_kr(vec![1.0, 2.0], vec![1.0, 1.0], 0.0).is_err());
    }
}
