//! Clustering algorithms for grouping embedding vectors.
//!
//! Two independent algorithms share the [`Cluster`] aggregate, the
//! Euclidean distance in [`crate::distance`], and the scoring utilities in
//! [`crate::metrics`].
//!
//! ## Algorithms
//!
//! ### K-means
//!
//! The classic algorithm: assign each point to the nearest centroid, then
//! update centroids to the mean of their points. Repeat.
//!
//! **Objective**: Minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! **Assumptions**:
//! - Clusters are roughly spherical
//! - Clusters have similar sizes
//! - You know k in advance (or can afford [`find_optimal_k`])
//!
//! ### Hierarchical (Agglomerative) Clustering
//!
//! Bottom-up: start with each point as its own cluster, repeatedly merge
//! the two closest clusters until one remains (or an early-stop condition
//! fires). The merge history forms a **dendrogram**.
//!
//! **Linkage methods** determine "distance between clusters":
//!
//! | Linkage | Distance | Effect |
//! |---------|----------|--------|
//! | Single | min(pairwise) | Chaining; elongated clusters |
//! | Complete | max(pairwise) | Compact, spherical clusters |
//! | Average | mean(pairwise) | Balanced compromise |
//! | Ward | √(n₁n₂/(n₁+n₂))·‖μ₁-μ₂‖ | Minimizes within-cluster variance |
//!
//! ## Usage
//!
//! ```rust
//! use cohort::{DataPoint, HierarchicalClustering, InitMethod, Kmeans, Linkage};
//!
//! let points = vec![
//!     DataPoint::new("a", vec![0.0, 0.0]),
//!     DataPoint::new("b", vec![0.0, 1.0]),
//!     DataPoint::new("c", vec![10.0, 10.0]),
//!     DataPoint::new("d", vec![10.0, 11.0]),
//! ];
//!
//! let result = Kmeans::new()
//!     .with_init(InitMethod::KmeansPlusPlus)
//!     .with_seed(7)
//!     .cluster(&points, 2)
//!     .unwrap();
//! assert_eq!(result.clusters.len(), 2);
//! assert!(result.converged);
//!
//! let tree = HierarchicalClustering::new(Linkage::Single).cluster(&points).unwrap();
//! assert_eq!(tree.dendrogram.len(), 3);
//! ```

mod dendrogram;
mod hierarchical;
mod kmeans;
mod optimal_k;
mod traits;

pub use dendrogram::{Dendrogram, Merge};
pub use hierarchical::{HierarchicalClustering, HierarchicalConfig, HierarchicalResult, Linkage};
pub use kmeans::{ClusteringResult, InitMethod, Kmeans, KmeansConfig};
pub use optimal_k::{find_optimal_k, KScore, OptimalK, OptimalKOptions, SelectionMethod};
pub use traits::Partition;

use crate::point::DataPoint;
use serde::{Deserialize, Serialize};

/// A group of points around a centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Label assigned by the algorithm. Only meaningful within one result.
    pub id: usize,
    /// Coordinate-wise mean of the members (stale for empty k-means clusters).
    pub centroid: Vec<f32>,
    /// Member points.
    pub points: Vec<DataPoint>,
    /// Sum of squared distances from members to the centroid.
    pub inertia: f64,
}

impl Cluster {
    /// Number of member points.
    #[inline]
    pub fn size(&self) -> usize {
        self.points.len()
    }

    /// Whether the cluster has no members.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Ids of the member points.
    pub fn point_ids(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|p| p.id.as_str())
    }

    /// Whether a point with this id is a member.
    pub fn contains(&self, id: &str) -> bool {
        self.points.iter().any(|p| p.id == id)
    }
}

/// Coordinate-wise mean, accumulated in `f64`. `members` must be non-empty.
pub(crate) fn mean_vector<'a>(
    members: impl IntoIterator<Item = &'a [f32]>,
    dim: usize,
) -> Vec<f32> {
    let mut sum = vec![0.0f64; dim];
    let mut count = 0usize;
    for v in members {
        for (s, x) in sum.iter_mut().zip(v) {
            *s += *x as f64;
        }
        count += 1;
    }
    debug_assert!(count > 0);
    sum.into_iter().map(|s| (s / count as f64) as f32).collect()
}
