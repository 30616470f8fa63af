//! Euclidean distance.
//!
//! Lengths are not re-checked here: every entry point validates
//! dimensionality once, up front, so callers always pass equal-length
//! vectors. A `debug_assert` catches violations in test builds.
//!
//! Accumulation happens in `f64` even though vectors are stored as `f32`;
//! inertia differences near the convergence tolerance are otherwise lost
//! to rounding.

use ndarray::ArrayView1;

#[inline]
fn sum_sq<'a>(a: impl Iterator<Item = &'a f32>, b: impl Iterator<Item = &'a f32>) -> f64 {
    a.zip(b)
        .map(|(x, y)| {
            let d = *x as f64 - *y as f64;
            d * d
        })
        .sum()
}

/// Squared Euclidean distance between two equal-length vectors.
#[inline]
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    sum_sq(a.iter(), b.iter())
}

/// Euclidean distance between two equal-length vectors.
///
/// ```rust
/// use cohort::distance::euclidean_distance;
///
/// let d = euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]);
/// assert!((d - 5.0).abs() < 1e-12);
/// ```
#[inline]
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f64 {
    squared_euclidean(a, b).sqrt()
}

/// Squared Euclidean distance between two matrix rows.
#[inline]
pub(crate) fn squared_euclidean_view(a: ArrayView1<'_, f32>, b: ArrayView1<'_, f32>) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    sum_sq(a.iter(), b.iter())
}
