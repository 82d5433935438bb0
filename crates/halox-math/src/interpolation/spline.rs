//! Natural cubic spline with analytic segment integrals.

use crate::error::{MathError, MathResult};

/// Natural cubic spline interpolation.
///
/// Constructs a smooth curve through data points using piecewise cubic
/// polynomials with continuous first and second derivatives.
/// "Natural" means the second derivative is zero at the endpoints.
///
/// Queries outside the knot range reuse the first or last cubic segment,
/// for both evaluation and integration.
///
/// # Example
///
/// ```rust
/// use halox_math::interpolation::CubicSpline;
///
/// let spline = CubicSpline::new(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 1.0, 4.0, 9.0]).unwrap();
/// assert!((spline.evaluate(2.0) - 4.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at each knot
    y2s: Vec<f64>,
    /// Integral from `xs[0]` to `xs[i]`
    cumulative: Vec<f64>,
}

impl CubicSpline {
    /// Minimum number of knots.
    pub const MIN_POINTS: usize = 2;

    /// Creates a natural cubic spline through `(xs, ys)`.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than two points, if the lengths
    /// differ, or if `xs` is not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        if xs.len() < Self::MIN_POINTS {
            return Err(MathError::insufficient_data(Self::MIN_POINTS, xs.len()));
        }
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(MathError::invalid_input(
                "x values must be strictly increasing",
            ));
        }

        Ok(Self::from_knots(xs, ys))
    }

    /// Builds the spline on knots already known to be valid.
    pub(crate) fn from_knots(xs: Vec<f64>, ys: Vec<f64>) -> Self {
        let y2s = compute_second_derivatives(&xs, &ys);
        let mut spline = Self {
            xs,
            ys,
            y2s,
            cumulative: Vec::new(),
        };
        spline.cumulative = spline.compute_cumulative();
        spline
    }

    /// Knot abscissas.
    pub fn knots(&self) -> &[f64] {
        &self.xs
    }

    /// Knot values.
    pub fn values(&self) -> &[f64] {
        &self.ys
    }

    /// Spline value at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let i = self.find_segment(x);

        let x_lo = self.xs[i];
        let x_hi = self.xs[i + 1];
        let h = x_hi - x_lo;
        let a = (x_hi - x) / h;
        let b = (x - x_lo) / h;

        a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a * a * a - a) * self.y2s[i] + (b * b * b - b) * self.y2s[i + 1]) * (h * h) / 6.0
    }

    /// Definite integral of the spline over `[a, b]`.
    ///
    /// Reversed limits give the negated integral and `integral(a, a)` is
    /// exactly zero.
    pub fn integral(&self, a: f64, b: f64) -> f64 {
        self.antiderivative(b) - self.antiderivative(a)
    }

    /// Integral from the first knot to `x`.
    fn antiderivative(&self, x: f64) -> f64 {
        let i = self.find_segment(x);
        self.cumulative[i] + self.segment_integral(i, x - self.xs[i])
    }

    /// Integral of segment `i` from its left knot over a length `t`.
    fn segment_integral(&self, i: usize, t: f64) -> f64 {
        let h = self.xs[i + 1] - self.xs[i];
        let b = t / h;
        let a = 1.0 - b;
        let half_t2 = t * t / (2.0 * h);

        let linear = self.ys[i] * (t - half_t2) + self.ys[i + 1] * half_t2;
        let curvature = self.y2s[i] * (0.25 * h * (1.0 - a.powi(4)) - (t - half_t2))
            + self.y2s[i + 1] * (0.25 * h * b.powi(4) - half_t2);

        linear + curvature * h * h / 6.0
    }

    fn compute_cumulative(&self) -> Vec<f64> {
        let mut cumulative = Vec::with_capacity(self.xs.len());
        let mut total = 0.0;
        cumulative.push(total);
        for i in 0..self.xs.len() - 1 {
            total += self.segment_integral(i, self.xs[i + 1] - self.xs[i]);
            cumulative.push(total);
        }
        cumulative
    }

    /// Finds the index i such that xs[i] <= x < xs[i+1], clamped to the
    /// first and last segment.
    fn find_segment(&self, x: f64) -> usize {
        match self.xs.binary_search_by(|probe| {
            probe.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal)
        }) {
            Ok(i) => i.min(self.xs.len() - 2),
            Err(i) => (i.saturating_sub(1)).min(self.xs.len() - 2),
        }
    }
}

/// Second derivatives of the natural spline (tridiagonal sweep).
fn compute_second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut y2s = vec![0.0; n];
    let mut u = vec![0.0; n - 1];

    for i in 1..n - 1 {
        let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
        let p = sig * y2s[i - 1] + 2.0;
        y2s[i] = (sig - 1.0) / p;
        let slope_jump = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
            - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
        u[i] = (6.0 * slope_jump / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
    }

    y2s[n - 1] = 0.0;
    for i in (0..n - 1).rev() {
        y2s[i] = y2s[i] * y2s[i + 1] + u[i];
    }

    y2s
}
