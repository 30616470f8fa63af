//! Hierarchical (agglomerative) clustering.
//!
//! Bottom-up clustering that builds a **dendrogram** by iteratively
//! merging the closest pair of clusters. Unlike K-means, you don't
//! need to specify k in advance: run to completion, or stop early at a
//! cluster count or a distance threshold.
//!
//! # Linkage Methods
//!
//! The key choice: how do we define "distance between clusters"?
//!
//! | Linkage | Formula | Effect |
//! |---------|---------|--------|
//! | Single | min(d(a,b)) for a∈A, b∈B | Chaining; sensitive to noise |
//! | Complete | max(d(a,b)) | Compact; sensitive to outliers |
//! | Average | mean(d(a,b)) | Balanced compromise |
//! | Ward | √(nₐnᵦ/(nₐ+nᵦ)) × ‖μₐ - μᵦ‖ | Minimizes within-cluster variance |
//!
//! Merge distances are non-decreasing for single, complete and average
//! linkage. Ward is centroid based and may produce inversions.
//!
//! # Complexity
//!
//! Every merge rescans all cluster pairs, O(n²) per step, against a
//! precomputed n × n point distance matrix. Ties go to the first pair found
//! in row-major order, which keeps results deterministic.

use super::dendrogram::Dendrogram;
use super::traits::Partition;
use super::{mean_vector, Cluster};
use crate::distance::euclidean_distance;
use crate::error::{Error, NumericError, Result};
use crate::metrics::cluster_inertia;
use crate::point::DataPoint;
use crate::validate::validate_points;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, trace};

/// Linkage method for hierarchical clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Linkage {
    /// Single linkage: minimum distance between clusters.
    Single,
    /// Complete linkage: maximum distance between clusters.
    Complete,
    /// Average linkage: mean distance between clusters.
    Average,
    /// Ward's method: minimize within-cluster variance.
    #[default]
    Ward,
}

/// Settings for [`HierarchicalClustering`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchicalConfig {
    /// Linkage method.
    pub linkage: Linkage,
    /// Stop once this many clusters remain.
    pub max_clusters: Option<usize>,
    /// Stop after the first merge whose distance exceeds this.
    pub distance_threshold: Option<f64>,
}

/// Output of one agglomerative run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchicalResult {
    /// Clusters remaining when merging stopped.
    pub clusters: Vec<Cluster>,
    /// Merge history, possibly truncated by early stopping.
    pub dendrogram: Dendrogram,
}

impl Partition for HierarchicalResult {
    fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }
}

/// Hierarchical (agglomerative) clustering.
#[derive(Debug, Clone, Default)]
pub struct HierarchicalClustering {
    config: HierarchicalConfig,
}

struct Working {
    id: usize,
    members: Vec<usize>,
    centroid: Vec<f32>,
}

impl HierarchicalClustering {
    /// Create a new hierarchical clusterer.
    pub fn new(linkage: Linkage) -> Self {
        Self {
            config: HierarchicalConfig {
                linkage,
                ..Default::default()
            },
        }
    }

    /// Create a clusterer from an explicit config.
    pub fn from_config(config: HierarchicalConfig) -> Self {
        Self { config }
    }

    /// Current settings.
    pub fn config(&self) -> &HierarchicalConfig {
        &self.config
    }

    /// Set linkage method.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.config.linkage = linkage;
        self
    }

    /// Stop merging once `max_clusters` clusters remain.
    pub fn with_max_clusters(mut self, max_clusters: usize) -> Self {
        self.config.max_clusters = Some(max_clusters);
        self
    }

    /// Stop after the first merge whose distance exceeds `threshold`.
    pub fn with_distance_threshold(mut self, threshold: f64) -> Self {
        self.config.distance_threshold = Some(threshold);
        self
    }

    /// Cluster `points` bottom-up.
    #[instrument(skip_all, fields(n_points = points.len(), linkage = ?self.config.linkage))]
    pub fn cluster(&self, points: &[DataPoint]) -> Result<HierarchicalResult> {
        validate_points(points)?;
        if self.config.max_clusters == Some(0) {
            return Err(Error::InvalidParameter {
                name: "max_clusters",
                message: "must be at least 1",
            });
        }
        if let Some(t) = self.config.distance_threshold {
            if t.is_nan() || t < 0.0 {
                return Err(Error::InvalidParameter {
                    name: "distance_threshold",
                    message: "must be non-negative",
                });
            }
        }

        self.run(points).map_err(Error::computation("hierarchical"))
    }

    fn run(&self, points: &[DataPoint]) -> std::result::Result<HierarchicalResult, NumericError> {
        let n = points.len();
        let dim = points[0].dim();

        let pairwise = point_distances(points);

        let mut clusters: Vec<Working> = points
            .iter()
            .enumerate()
            .map(|(i, p)| Working {
                id: i,
                members: vec![i],
                centroid: p.vector.clone(),
            })
            .collect();

        let mut dendrogram = Dendrogram::new(n);
        let stop_at = self.config.max_clusters.unwrap_or(1).max(1);

        while clusters.len() > stop_at {
            let step = dendrogram.len() + 1;

            let mut best = (0, 1, f64::INFINITY);
            for i in 0..clusters.len() {
                for j in (i + 1)..clusters.len() {
                    let d = self.linkage_distance(&clusters[i], &clusters[j], &pairwise);
                    if !d.is_finite() {
                        return Err(NumericError::NonFinite {
                            quantity: "linkage distance",
                            iteration: step,
                        });
                    }
                    if d < best.2 {
                        best = (i, j, d);
                    }
                }
            }
            let (i, j, distance) = best;

            let removed = clusters.remove(j);
            let target = &mut clusters[i];
            target.members.extend(removed.members);
            target.centroid = mean_vector(
                target.members.iter().map(|&m| points[m].vector.as_slice()),
                dim,
            );
            target.id = n + step - 1;

            dendrogram.add_merge(i, j, distance, target.members.len());
            trace!(
                step,
                cluster1 = i,
                cluster2 = j,
                distance,
                size = target.members.len(),
                "merge"
            );

            if self.config.distance_threshold.is_some_and(|t| distance > t) {
                break;
            }
        }

        info!(n_clusters = clusters.len(), merges = dendrogram.len(), "agglomeration finished");

        let clusters = clusters
            .into_iter()
            .map(|w| {
                let members: Vec<DataPoint> =
                    w.members.iter().map(|&m| points[m].clone()).collect();
                let inertia =
                    cluster_inertia(members.iter().map(|p| p.vector.as_slice()), &w.centroid);
                Cluster {
                    id: w.id,
                    centroid: w.centroid,
                    points: members,
                    inertia,
                }
            })
            .collect();

        Ok(HierarchicalResult {
            clusters,
            dendrogram,
        })
    }

    fn linkage_distance(&self, a: &Working, b: &Working, pairwise: &Array2<f64>) -> f64 {
        match self.config.linkage {
            Linkage::Single => member_pairs(a, b, pairwise).fold(f64::INFINITY, f64::min),
            Linkage::Complete => member_pairs(a, b, pairwise).fold(f64::NEG_INFINITY, f64::max),
            Linkage::Average => {
                let pairs = (a.members.len() * b.members.len()) as f64;
                member_pairs(a, b, pairwise).sum::<f64>() / pairs
            }
            Linkage::Ward => {
                let (na, nb) = (a.members.len() as f64, b.members.len() as f64);
                ((na * nb) / (na + nb)).sqrt() * euclidean_distance(&a.centroid, &b.centroid)
            }
        }
    }
}

/// Point distances across every (a, b) member pair.
fn member_pairs<'a>(
    a: &'a Working,
    b: &'a Working,
    pairwise: &'a Array2<f64>,
) -> impl Iterator<Item = f64> + 'a {
    a.members
        .iter()
        .flat_map(move |&x| b.members.iter().map(move |&y| pairwise[[x, y]]))
}

/// Symmetric n × n Euclidean distance matrix.
fn point_distances(points: &[DataPoint]) -> Array2<f64> {
    let n = points.len();
    let mut m = Array2::zeros((n, n));
    for i in 0..n {
        for j in (i + 1)..n {
            let d = euclidean_distance(&points[i].vector, &points[j].vector);
            m[[i, j]] = d;
            m[[j, i]] = d;
        }
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn four() -> Vec<DataPoint> {
        vec![
            DataPoint::new("a", vec![0.0, 0.0]),
            DataPoint::new("b", vec![0.0, 1.0]),
            DataPoint::new("c", vec![10.0, 10.0]),
            DataPoint::new("d", vec![10.0, 11.0]),
        ]
    }

    fn line(n: usize) -> Vec<DataPoint> {
        // Gaps grow quadratically so every pairwise distance is distinct.
        (0..n)
            .map(|i| DataPoint::new(format!("p{i}"), vec![(i * i) as f32, (i % 3) as f32]))
            .collect()
    }

    #[test]
    fn test_single_linkage_pairs_first() {
        let result = HierarchicalClustering::new(Linkage::Single)
            .cluster(&four())
            .unwrap();
        let merges = result.dendrogram.entries();

        assert_eq!(merges.len(), 3);
        assert_eq!((merges[0].cluster1, merges[0].cluster2), (0, 1));
        assert_eq!((merges[1].cluster1, merges[1].cluster2), (1, 2));
        assert_eq!((merges[2].cluster1, merges[2].cluster2), (0, 1));
        assert!((merges[0].distance - 1.0).abs() < 1e-9);
        assert!((merges[1].distance - 1.0).abs() < 1e-9);
        assert!((merges[2].distance - 181f64.sqrt()).abs() < 1e-9);
        assert!(merges[2].distance > 10.0 * merges[1].distance);
        assert_eq!(merges.iter().map(|m| m.size).collect::<Vec<_>>(), vec![2, 2, 4]);
    }

    #[test]
    fn test_runs_to_single_cluster() {
        for linkage in [Linkage::Single, Linkage::Complete, Linkage::Average, Linkage::Ward] {
            let data = line(9);
            let result = HierarchicalClustering::new(linkage).cluster(&data).unwrap();

            assert_eq!(result.dendrogram.len(), data.len() - 1);
            assert_eq!(result.clusters.len(), 1);
            let root = &result.clusters[0];
            assert_eq!(root.size(), data.len());
            let mut ids: Vec<&str> = root.point_ids().collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), data.len());
        }
    }

    #[test]
    fn test_monotonic_for_graph_linkages() {
        for linkage in [Linkage::Single, Linkage::Complete, Linkage::Average] {
            let result = HierarchicalClustering::new(linkage).cluster(&line(12)).unwrap();
            assert!(result.dendrogram.is_monotonic(), "{linkage:?}");
        }
    }

    #[test]
    fn test_ward_distance_formula() {
        let result = HierarchicalClustering::new(Linkage::Ward)
            .cluster(&four())
            .unwrap();
        let d = result.dendrogram.distances();
        assert!((d[0] - 0.5f64.sqrt()).abs() < 1e-9);
        assert!((d[1] - 0.5f64.sqrt()).abs() < 1e-9);
        // sqrt(2*2/4) * |(0,0.5) - (10,10.5)|
        assert!((d[2] - 200f64.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_complete_and_average_values() {
        let complete = HierarchicalClustering::new(Linkage::Complete)
            .cluster(&four())
            .unwrap();
        // max over {a,b} x {c,d} is |a - d| = sqrt(221)
        assert!((complete.dendrogram.distances()[2] - 221f64.sqrt()).abs() < 1e-9);

        let average = HierarchicalClustering::new(Linkage::Average)
            .cluster(&four())
            .unwrap();
        let expected = (2.0 * 200f64.sqrt() + 181f64.sqrt() + 221f64.sqrt()) / 4.0;
        assert!((average.dendrogram.distances()[2] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_max_clusters_stops_early() {
        let result = HierarchicalClustering::new(Linkage::Single)
            .with_max_clusters(2)
            .cluster(&four())
            .unwrap();

        assert_eq!(result.clusters.len(), 2);
        assert_eq!(result.dendrogram.len(), 2);
        let labels = result.labels();
        assert_eq!(labels["a"], labels["b"]);
        assert_eq!(labels["c"], labels["d"]);
        assert_ne!(labels["a"], labels["c"]);

        for c in &result.clusters {
            assert!((c.inertia - 0.5).abs() < 1e-9);
        }
        assert!(result.silhouette() > 0.9);
    }

    #[test]
    fn test_max_clusters_at_least_n_means_no_merges() {
        let result = HierarchicalClustering::new(Linkage::Average)
            .with_max_clusters(10)
            .cluster(&four())
            .unwrap();
        assert_eq!(result.clusters.len(), 4);
        assert!(result.dendrogram.is_empty());
    }

    #[test]
    fn test_distance_threshold_keeps_exceeding_merge() {
        let result = HierarchicalClustering::new(Linkage::Single)
            .with_distance_threshold(0.5)
            .cluster(&four())
            .unwrap();
        // First merge (distance 1.0) already exceeds the threshold.
        assert_eq!(result.dendrogram.len(), 1);
        assert_eq!(result.clusters.len(), 3);

        let result = HierarchicalClustering::new(Linkage::Single)
            .with_distance_threshold(5.0)
            .cluster(&four())
            .unwrap();
        assert_eq!(result.dendrogram.len(), 3);
    }

    #[test]
    fn test_merged_ids_follow_leaves() {
        let result = HierarchicalClustering::new(Linkage::Single)
            .cluster(&four())
            .unwrap();
        // Leaves are 0..4, merges are 4, 5, 6.
        assert_eq!(result.clusters[0].id, 6);
        assert_eq!(result.clusters[0].centroid, vec![5.0, 5.5]);
    }

    #[test]
    fn test_single_point() {
        let data = vec![DataPoint::new("solo", vec![1.0, 2.0, 3.0])];
        let result = HierarchicalClustering::default().cluster(&data).unwrap();
        assert_eq!(result.clusters.len(), 1);
        assert!(result.dendrogram.is_empty());
        assert_eq!(result.clusters[0].inertia, 0.0);
    }

    #[test]
    fn test_validation_errors() {
        let hc = HierarchicalClustering::default();
        assert!(matches!(hc.cluster(&[]), Err(Error::EmptyInput)));

        let ragged = vec![
            DataPoint::new("a", vec![0.0, 0.0]),
            DataPoint::new("b", vec![1.0]),
        ];
        assert!(hc.cluster(&ragged).unwrap_err().is_validation());

        assert!(HierarchicalClustering::default()
            .with_max_clusters(0)
            .cluster(&four())
            .is_err());
        assert!(HierarchicalClustering::default()
            .with_distance_threshold(f64::NAN)
            .cluster(&four())
            .is_err());
    }

    #[test]
    fn test_non_finite_input_is_computation_error() {
        let data = vec![
            DataPoint::new("a", vec![f32::INFINITY, 0.0]),
            DataPoint::new("b", vec![1.0, 1.0]),
        ];
        let err = HierarchicalClustering::new(Linkage::Single)
            .cluster(&data)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Computation);
    }

    #[test]
    fn test_config_from_json() {
        let config: HierarchicalConfig =
            serde_json::from_str(r#"{"linkage":"average","max_clusters":3}"#).unwrap();
        let hc = HierarchicalClustering::from_config(config);
        assert_eq!(hc.config().linkage, Linkage::Average);
        assert_eq!(hc.config().distance_threshold, None);
        assert_eq!(HierarchicalConfig::default().linkage, Linkage::Ward);
    }
}
