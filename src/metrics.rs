//! Internal clustering quality metrics.
//!
//! These measure a partition against the data itself, with no ground truth.
//!
//! # Metrics Overview
//!
//! | Metric | Range | Best | Properties |
//! |--------|-------|------|------------|
//! | [`cluster_inertia`] | [0, ∞) | 0 | Compactness; always falls as k grows |
//! | [`silhouette_score`] | [-1, 1] | 1 | Cohesion vs. separation; comparable across k |
//!
//! # When to Use Which
//!
//! - **Inertia**: Convergence tracking inside k-means, and the elbow curve
//! - **Silhouette**: Choosing k, or comparing algorithms on the same data
//!
//! # Silhouette Conventions
//!
//! For point i in cluster C:
//!
//! ```text
//! a(i) = mean distance from i to the other members of C   (0 if |C| = 1)
//! b(i) = min over non-empty C' ≠ C of mean distance from i to members of C'
//! s(i) = (b - a) / max(a, b)
//! ```
//!
//! `s(i) = 0` when no other non-empty cluster exists (so a single-cluster
//! partition scores exactly 0) or when `max(a, b) = 0`.
//!
//! # References
//!
//! - Rousseeuw (1987). "Silhouettes: a graphical aid to the interpretation
//!   and validation of cluster analysis"

use crate::distance::{euclidean_distance, squared_euclidean};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Sum of squared distances from each member to `centroid`.
pub fn cluster_inertia<'a>(members: impl IntoIterator<Item = &'a [f32]>, centroid: &[f32]) -> f64 {
    members
        .into_iter()
        .map(|v| squared_euclidean(v, centroid))
        .sum()
}

/// Per-point silhouette values.
///
/// `labels[i]` is the cluster of `vectors[i]`; labels need not be contiguous
/// but must be below `n_clusters`.
pub fn silhouette_samples(vectors: &[&[f32]], labels: &[usize], n_clusters: usize) -> Vec<f64> {
    debug_assert_eq!(vectors.len(), labels.len());

    let mut sizes = vec![0usize; n_clusters];
    for &l in labels {
        sizes[l] += 1;
    }

    let score = |i: usize| -> f64 {
        let own = labels[i];
        let mut sums = vec![0.0f64; n_clusters];
        for (j, v) in vectors.iter().enumerate() {
            if j != i {
                sums[labels[j]] += euclidean_distance(vectors[i], v);
            }
        }

        let a = if sizes[own] > 1 {
            sums[own] / (sizes[own] - 1) as f64
        } else {
            0.0
        };

        let b = (0..n_clusters)
            .filter(|&c| c != own && sizes[c] > 0)
            .map(|c| sums[c] / sizes[c] as f64)
            .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |m| m.min(d))));

        match b {
            None => 0.0,
            Some(b) => {
                let denom = a.max(b);
                if denom > 0.0 {
                    (b - a) / denom
                } else {
                    0.0
                }
            }
        }
    };

    #[cfg(feature = "parallel")]
    {
        (0..vectors.len()).into_par_iter().map(score).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..vectors.len()).map(score).collect()
    }
}

/// Mean silhouette over all points, in [-1, 1].
///
/// ```rust
/// use cohort::metrics::silhouette_score;
///
/// let vectors: Vec<&[f32]> = vec![&[0.0, 0.0], &[0.0, 1.0], &[10.0, 10.0], &[10.0, 11.0]];
/// let s = silhouette_score(&vectors, &[0, 0, 1, 1], 2);
/// assert!(s > 0.9);
/// ```
pub fn silhouette_score(vectors: &[&[f32]], labels: &[usize], n_clusters: usize) -> f64 {
    if vectors.is_empty() {
        return 0.0;
    }
    let samples = silhouette_samples(vectors, labels, n_clusters);
    samples.iter().sum::<f64>() / samples.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four() -> Vec<&'static [f32]> {
        vec![&[0.0, 0.0], &[0.0, 1.0], &[10.0, 10.0], &[10.0, 11.0]]
    }

    #[test]
    fn test_inertia_of_pair() {
        let members: Vec<&[f32]> = vec![&[0.0, 0.0], &[0.0, 1.0]];
        let inertia = cluster_inertia(members, &[0.0, 0.5]);
        assert!((inertia - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_inertia_empty_is_zero() {
        assert_eq!(cluster_inertia(Vec::<&[f32]>::new(), &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_silhouette_well_separated() {
        let s = silhouette_score(&four(), &[0, 0, 1, 1], 2);
        assert!(s > 0.9 && s <= 1.0, "got {s}");
    }

    #[test]
    fn test_silhouette_single_cluster_is_zero() {
        assert_eq!(silhouette_score(&four(), &[0, 0, 0, 0], 1), 0.0);
    }

    #[test]
    fn test_silhouette_bad_partition_is_negative() {
        // Each cluster straddles both groups.
        let s = silhouette_score(&four(), &[0, 1, 0, 1], 2);
        assert!(s < 0.0, "got {s}");
    }

    #[test]
    fn test_silhouette_ignores_empty_clusters() {
        let with_gap = silhouette_score(&four(), &[0, 0, 2, 2], 3);
        let dense = silhouette_score(&four(), &[0, 0, 1, 1], 2);
        assert!((with_gap - dense).abs() < 1e-12);
    }

    #[test]
    fn test_silhouette_singletons_score_one() {
        let samples = silhouette_samples(&four(), &[0, 1, 2, 3], 4);
        assert!(samples.iter().all(|&s| (s - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_silhouette_duplicates_are_zero() {
        let dup: Vec<&[f32]> = vec![&[1.0], &[1.0]];
        assert_eq!(silhouette_score(&dup, &[0, 1], 2), 0.0);
    }
}
