//! Deterministic sampling grids.
//!
//! Both generators produce exactly `n` points. For `n >= 2` the first and
//! last points are `min` and `max` bit for bit, so tables built from the
//! same `(n, min, max)` share abscissas and end points.

/// Returns `n` evenly spaced points on `[min, max]`.
///
/// The step is `(max - min) / (n - 1)` and interior point `i` is
/// `min + i * step`. For `n == 1` the single point is `min`.
///
/// # Example
///
/// ```rust
/// use halox_math::grid::lin_space;
///
/// assert_eq!(lin_space(3, 0.0, 1.0), vec![0.0, 0.5, 1.0]);
/// ```
pub fn lin_space(n: usize, min: f64, max: f64) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (n - 1) as f64;
            let mut xs: Vec<f64> = (0..n).map(|i| min + step * i as f64).collect();
            xs[n - 1] = max;
            xs
        }
    }
}

/// Returns `n` logarithmically spaced points on `[min, max]`.
///
/// `[ln min, ln max]` is divided evenly and the interior points
/// exponentiated; `exp(ln x)` does not round-trip, so the end points are
/// copied from the bounds. Both bounds must be strictly positive; this is
/// not checked.
///
/// # Example
///
/// ```rust
/// use halox_math::grid::log_space;
///
/// let xs = log_space(3, 1.0, 100.0);
/// assert!((xs[1] - 10.0).abs() < 1e-12);
/// ```
pub fn log_space(n: usize, min: f64, max: f64) -> Vec<f64> {
    let mut xs: Vec<f64> = lin_space(n, min.ln(), max.ln())
        .into_iter()
        .map(f64::exp)
        .collect();
    if let Some(first) = xs.first_mut() {
        *first = min;
    }
    if n >= 2 {
        xs[n - 1] = max;
    }
    xs
}

/// Geometric mid-point of the first and last element of a grid.
///
/// NaN for an empty grid.
pub fn geometric_center(xs: &[f64]) -> f64 {
    match (xs.first(), xs.last()) {
        (Some(first), Some(last)) => (first * last).sqrt(),
        _ => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_lin_space_endpoints() {
        let xs = lin_space(11, -1.0, 1.0);
        assert_eq!(xs.len(), 11);
        assert_eq!(xs[0], -1.0);
        assert_relative_eq!(xs[5], 0.0, epsilon = 1e-15);
        assert_eq!(xs[10], 1.0);
        assert_eq!(*lin_space(4, 0.1, 0.7).last().unwrap(), 0.7);
    }

    #[test]
    fn test_log_space_hits_bounds_exactly() {
        let xs = log_space(7, 1e-3, 1e3);
        assert_eq!(xs[0], 1e-3);
        assert_eq!(xs[6], 1e3);
        let single = log_space(1, 3e-7, 1e7);
        assert_eq!(single, vec![3e-7]);
    }

    #[test]
    fn test_degenerate_sizes() {
        assert!(lin_space(0, 0.0, 1.0).is_empty());
        assert_eq!(lin_space(1, 2.0, 5.0), vec![2.0]);
        assert!(log_space(0, 1.0, 10.0).is_empty());
    }

    #[test]
    fn test_log_space_ratio_is_constant() {
        let xs = log_space(5, 1e-4, 1e4);
        for w in xs.windows(2) {
            assert_relative_eq!(w[1] / w[0], 100.0, max_relative = 1e-12);
        }
        assert_relative_eq!(xs[0], 1e-4, max_relative = 1e-14);
        assert_relative_eq!(xs[4], 1e4, max_relative = 1e-14);
    }

    #[test]
    fn test_geometric_center() {
        assert_relative_eq!(geometric_center(&[1.0, 10.0, 100.0]), 10.0);
        assert!(geometric_center(&[]).is_nan());
    }

    proptest! {
        #[test]
        fn prop_grids_are_strictly_increasing(
            n in 2usize..300,
            lo in 1e-6f64..1.0,
            span in 1.5f64..1e6,
        ) {
            let hi = lo * span;
            let lin = lin_space(n, lo, hi);
            let log = log_space(n, lo, hi);
            prop_assert_eq!(lin.len(), n);
            prop_assert_eq!(log.len(), n);
            prop_assert!(lin.windows(2).all(|w| w[1] > w[0]));
            prop_assert!(log.windows(2).all(|w| w[1] > w[0]));
            prop_assert_eq!(log[0], lo);
            prop_assert_eq!(log[n - 1], hi);
            prop_assert_eq!(lin[n - 1], hi);
        }

        #[test]
        fn prop_grids_are_reproducible(n in 2usize..100, lo in 0.1f64..1.0) {
            prop_assert_eq!(log_space(n, lo, 10.0), log_space(n, lo, 10.0));
        }
    }
}
