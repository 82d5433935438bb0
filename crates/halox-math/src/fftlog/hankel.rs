//! Discrete Hankel transform on a logarithmic grid (Hamilton 2000).

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

use crate::error::{MathError, MathResult};
use crate::special::ln_gamma;

/// Nearest low-ringing value of `kr`.
///
/// Shifts `kr` by less than half a grid step so that the Nyquist
/// coefficient of the kernel is real.
pub fn low_ringing_kr(order: f64, bias: f64, dlnr: f64, kr: f64) -> f64 {
    if dlnr == 0.0 {
        return kr;
    }
    let y = PI / (2.0 * dlnr);
    let zp = ln_gamma(Complex64::new(0.5 * (order + 1.0 + bias), y));
    let zm = ln_gamma(Complex64::new(0.5 * (order + 1.0 - bias), y));
    let arg = (2.0 / kr).ln() / dlnr + (zp.im + zm.im) / PI;
    let nearest = arg.round();
    if arg == nearest {
        kr
    } else {
        kr * ((arg - nearest) * dlnr).exp()
    }
}

/// Precomputed kernel coefficients of a Hankel transform of fixed size,
/// order and spacing (unbiased, `q = 0`).
///
/// With input `a_j` at `r_j = r_c exp((j - j_c) dlnr)` the output is
/// `ã_j = ∫ a(r) J_mu(k_j r) k_j dr` at `k_j = k_c exp((j - j_c) dlnr)`,
/// where `k_c r_c = kr`.
pub struct HankelPlan {
    size: usize,
    order: f64,
    dlnr: f64,
    kr: f64,
    /// Kernel times centering phase, indexed like the FFT output
    coefficients: Vec<Complex64>,
    fft: Arc<dyn Fft<f64>>,
}

impl fmt::Debug for HankelPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HankelPlan")
            .field("size", &self.size)
            .field("order", &self.order)
            .field("dlnr", &self.dlnr)
            .field("kr", &self.kr)
            .finish_non_exhaustive()
    }
}

impl HankelPlan {
    /// Plans a transform of `size` points.
    ///
    /// With `low_ringing` set, `kr` is first moved to [`low_ringing_kr`].
    ///
    /// # Errors
    ///
    /// Returns an error for an empty grid, a non-positive spacing or a
    /// non-positive `kr`.
    pub fn new(size: usize, order: f64, dlnr: f64, kr: f64, low_ringing: bool) -> MathResult<Self> {
        if size == 0 {
            return Err(MathError::insufficient_data(1, 0));
        }
        if !(dlnr > 0.0) || !(kr > 0.0) {
            return Err(MathError::invalid_input(format!(
                "Hankel transform needs dlnr > 0 and kr > 0, got dlnr = {dlnr}, kr = {kr}"
            )));
        }

        let kr = if low_ringing {
            low_ringing_kr(order, 0.0, dlnr, kr)
        } else {
            kr
        };

        let n = size as f64;
        let center = 0.5 * (n - 1.0);
        let x = 0.5 * (order + 1.0);
        let log_two_over_kr = (2.0 / kr).ln();

        let coefficients = (0..size)
            .map(|index| {
                let m = signed_frequency(index, size) as f64;
                let eta = 2.0 * PI * m / (n * dlnr);
                let theta = eta * log_two_over_kr + 2.0 * ln_gamma(Complex64::new(x, 0.5 * eta)).im
                    + 4.0 * PI * m * center / n;
                let coefficient = Complex64::from_polar(1.0, theta);
                if 2 * index == size {
                    // Nyquist term of an even grid: keep the real part
                    Complex64::new(coefficient.re, 0.0)
                } else {
                    coefficient
                }
            })
            .collect();

        let fft = FftPlanner::new().plan_fft_forward(size);

        Ok(Self {
            size,
            order,
            dlnr,
            kr,
            coefficients,
            fft,
        })
    }

    /// Number of grid points.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The `kr` actually used, after any low-ringing adjustment.
    pub fn kr(&self) -> f64 {
        self.kr
    }

    /// Bessel order.
    pub fn order(&self) -> f64 {
        self.order
    }

    /// Logarithmic grid spacing.
    pub fn dlnr(&self) -> f64 {
        self.dlnr
    }

    /// Transforms `input` into the conjugate grid.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::SizeMismatch`] if `input` does not match the plan.
    pub fn transform(&self, input: &[f64]) -> MathResult<Vec<f64>> {
        if input.len() != self.size {
            return Err(MathError::size_mismatch(self.size, input.len()));
        }

        let mut buffer: Vec<Complex64> = input.iter().map(|&a| Complex64::new(a, 0.0)).collect();
        self.fft.process(&mut buffer);
        for (value, coefficient) in buffer.iter_mut().zip(&self.coefficients) {
            *value *= coefficient;
        }
        self.fft.process(&mut buffer);

        let norm = 1.0 / self.size as f64;
        Ok(buffer.iter().map(|z| z.re * norm).collect())
    }
}

/// Maps an FFT bin onto its signed frequency in `(-n/2, n/2]`.
fn signed_frequency(index: usize, size: usize) -> i64 {
    if 2 * index <= size {
        index as i64
    } else {
        index as i64 - size as i64
    }
}
