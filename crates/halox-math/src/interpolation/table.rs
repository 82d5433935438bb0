//! Tabulated functions closed under pointwise arithmetic.

use std::marker::PhantomData;

use crate::error::{MathError, MathResult};
use crate::interpolation::scale::{GridScale, Linear, Logarithmic};
use crate::interpolation::spline::CubicSpline;
use crate::interpolation::Interpolator;

/// A function tabulated on a fixed grid and interpolated by a natural cubic
/// spline.
///
/// The grid strategy `S` is fixed at construction. Two tables with the same
/// strategy and the same number of points can be added or multiplied; the
/// result lives on the grid of the left operand.
///
/// Evaluation and integration outside the tabulated range extrapolate the
/// boundary spline segments. Keeping queries inside the range is the
/// caller's job.
///
/// # Example
///
/// ```rust
/// use halox_math::interpolation::{Interpolator, LogInterpolator};
///
/// let table = LogInterpolator::from_fn(|x| x, 0.5, 10.0, 20).unwrap();
/// assert!((table.integrate(1.0, 2.0) - 1.5).abs() < 1e-4);
/// ```
#[derive(Debug, Clone)]
pub struct TabulatedFunction<S: GridScale> {
    xs: Vec<f64>,
    fs: Vec<f64>,
    /// Values actually splined, `S::weight(x, f)`
    gs: Vec<f64>,
    spline: CubicSpline,
    scale: PhantomData<S>,
}

/// Table on a linear grid.
pub type LinearInterpolator = TabulatedFunction<Linear>;

/// Table on a logarithmic grid.
pub type LogInterpolator = TabulatedFunction<Logarithmic>;

impl<S: GridScale> TabulatedFunction<S> {
    /// Samples `f` at `thinness` points on `[min, max]`.
    ///
    /// Points are evenly spaced in the grid variable (`x` or `ln x`).
    ///
    /// # Errors
    ///
    /// Returns an error if `thinness < 2`, if a bound is not admissible for
    /// the grid, or if `max <= min`.
    pub fn from_fn<F>(f: F, min: f64, max: f64, thinness: usize) -> MathResult<Self>
    where
        F: Fn(f64) -> f64,
    {
        if thinness < CubicSpline::MIN_POINTS {
            return Err(MathError::insufficient_data(
                CubicSpline::MIN_POINTS,
                thinness,
            ));
        }
        S::check_abscissa(min)?;
        S::check_abscissa(max)?;
        if !(max > min) {
            return Err(MathError::invalid_input(format!(
                "empty sampling range [{min}, {max}]"
            )));
        }

        let knots = S::sample_knots(thinness, min, max);
        let xs: Vec<f64> = knots.iter().map(|&u| S::from_knot(u)).collect();
        let fs: Vec<f64> = xs.iter().map(|&x| f(x)).collect();
        Ok(Self::assemble(xs, fs, knots))
    }

    /// Builds a table from supplied samples.
    ///
    /// The abscissas need not be evenly spaced in the grid variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the lengths differ, fewer than two points are
    /// given, an abscissa is not admissible for the grid, or the abscissas
    /// are not strictly increasing.
    pub fn from_samples(xs: Vec<f64>, fs: Vec<f64>) -> MathResult<Self> {
        if xs.len() != fs.len() {
            return Err(MathError::invalid_input(format!(
                "xs and fs must have same length: {} vs {}",
                xs.len(),
                fs.len()
            )));
        }
        for &x in &xs {
            S::check_abscissa(x)?;
        }
        let knots: Vec<f64> = xs.iter().map(|&x| S::to_knot(x)).collect();
        let gs: Vec<f64> = xs.iter().zip(&fs).map(|(&x, &f)| S::weight(x, f)).collect();

        let spline = CubicSpline::new(knots, gs.clone())?;
        Ok(Self {
            xs,
            fs,
            gs,
            spline,
            scale: PhantomData,
        })
    }

    fn assemble(xs: Vec<f64>, fs: Vec<f64>, knots: Vec<f64>) -> Self {
        let gs: Vec<f64> = xs.iter().zip(&fs).map(|(&x, &f)| S::weight(x, f)).collect();
        Self::with_weighted(xs, fs, gs, knots)
    }

    fn with_weighted(xs: Vec<f64>, fs: Vec<f64>, gs: Vec<f64>, knots: Vec<f64>) -> Self {
        let spline = CubicSpline::from_knots(knots, gs.clone());
        Self {
            xs,
            fs,
            gs,
            spline,
            scale: PhantomData,
        }
    }

    /// A new table on this grid carrying different values.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::SizeMismatch`] if `fs` does not match the grid.
    pub fn with_values(&self, fs: Vec<f64>) -> MathResult<Self> {
        if fs.len() != self.len() {
            return Err(MathError::size_mismatch(self.len(), fs.len()));
        }
        Ok(Self::assemble(
            self.xs.clone(),
            fs,
            self.spline.knots().to_vec(),
        ))
    }

    /// Applies `g` to every tabulated value, keeping the grid.
    #[must_use]
    pub fn map_values<G>(&self, g: G) -> Self
    where
        G: Fn(f64) -> f64,
    {
        let fs = self.fs.iter().map(|&f| g(f)).collect();
        Self::assemble(self.xs.clone(), fs, self.spline.knots().to_vec())
    }

    /// Multiplies the table by a constant.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        let fs = self.fs.iter().map(|f| f * factor).collect();
        let gs = self.gs.iter().map(|g| g * factor).collect();
        Self::with_weighted(self.xs.clone(), fs, gs, self.spline.knots().to_vec())
    }

    /// Pointwise sum of two tables on the same grid.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::SizeMismatch`] if the grids differ in size.
    pub fn add(&self, other: &Self) -> MathResult<Self> {
        self.check_same_size(other)?;
        let fs = self.fs.iter().zip(&other.fs).map(|(a, b)| a + b).collect();
        let gs = self.gs.iter().zip(&other.gs).map(|(a, b)| a + b).collect();
        Ok(Self::with_weighted(
            self.xs.clone(),
            fs,
            gs,
            self.spline.knots().to_vec(),
        ))
    }

    /// Pointwise product of two tables on the same grid.
    ///
    /// The weighted values of `self` are multiplied by the plain values of
    /// `other`, so a log-grid product still splines `x f g`.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::SizeMismatch`] if the grids differ in size.
    pub fn multiply(&self, other: &Self) -> MathResult<Self> {
        self.check_same_size(other)?;
        let fs = self.fs.iter().zip(&other.fs).map(|(a, b)| a * b).collect();
        let gs = self.gs.iter().zip(&other.fs).map(|(a, b)| a * b).collect();
        Ok(Self::with_weighted(
            self.xs.clone(),
            fs,
            gs,
            self.spline.knots().to_vec(),
        ))
    }

    /// Pointwise combination `op(self_i, other_i)` on the same grid.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::SizeMismatch`] if the grids differ in size.
    pub fn combine<F>(&self, other: &Self, op: F) -> MathResult<Self>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.check_same_size(other)?;
        let fs = self
            .fs
            .iter()
            .zip(&other.fs)
            .map(|(&a, &b)| op(a, b))
            .collect();
        Ok(Self::assemble(
            self.xs.clone(),
            fs,
            self.spline.knots().to_vec(),
        ))
    }

    fn check_same_size(&self, other: &Self) -> MathResult<()> {
        if self.len() == other.len() {
            Ok(())
        } else {
            Err(MathError::size_mismatch(self.len(), other.len()))
        }
    }

    /// Tabulated abscissas.
    pub fn x_values(&self) -> &[f64] {
        &self.xs
    }

    /// Tabulated function values.
    pub fn f_values(&self) -> &[f64] {
        &self.fs
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Always false for a constructed table.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Grid strategy name.
    pub fn scale_name(&self) -> &'static str {
        S::NAME
    }
}

impl<S: GridScale> Interpolator for TabulatedFunction<S> {
    fn evaluate(&self, x: f64) -> f64 {
        S::unweight(x, self.spline.evaluate(S::to_knot(x)))
    }

    fn integrate(&self, a: f64, b: f64) -> f64 {
        self.spline.integral(S::to_knot(a), S::to_knot(b))
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}
