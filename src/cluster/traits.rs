//! Traits shared by clustering results.

use super::Cluster;
use crate::metrics::silhouette_score;
use std::collections::HashMap;

/// A set of disjoint clusters produced by one clustering call.
pub trait Partition {
    /// Final clusters.
    fn clusters(&self) -> &[Cluster];

    /// Number of points across all clusters.
    fn n_points(&self) -> usize {
        self.clusters().iter().map(Cluster::size).sum()
    }

    /// Map each point id to the id of the cluster holding it.
    ///
    /// Duplicate point ids collapse to the last cluster seen.
    fn labels(&self) -> HashMap<String, usize> {
        self.clusters()
            .iter()
            .flat_map(|c| c.points.iter().map(move |p| (p.id.clone(), c.id)))
            .collect()
    }

    /// Silhouette score of this partition, in [-1, 1].
    fn silhouette(&self) -> f64 {
        let clusters = self.clusters();
        let mut vectors: Vec<&[f32]> = Vec::with_capacity(self.n_points());
        let mut labels = Vec::with_capacity(self.n_points());
        for (pos, c) in clusters.iter().enumerate() {
            for p in &c.points {
                vectors.push(&p.vector);
                labels.push(pos);
            }
        }
        silhouette_score(&vectors, &labels, clusters.len())
    }
}
