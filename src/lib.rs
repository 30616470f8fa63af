//! # cohort
//!
//! Clustering engine for embedding vectors: partition-based k-means (with
//! k-means++ seeding and k selection) and agglomerative clustering with
//! selectable linkage, plus inertia and silhouette quality metrics.
//!
//! Every call is a pure function of its input and an explicit random seed.
//! Nothing is cached or persisted between calls, and no I/O happens inside
//! the algorithms. Callers own the vectors going in and the result coming out.
//!
//! ```rust
//! use cohort::{DataPoint, Kmeans, OptimalKOptions, Partition, SelectionMethod};
//!
//! let points: Vec<DataPoint> = (0..12)
//!     .map(|i| {
//!         let base = if i < 6 { 0.0 } else { 50.0 };
//!         DataPoint::new(format!("doc-{i}"), vec![base + (i % 3) as f32, base])
//!     })
//!     .collect();
//!
//! let model = Kmeans::new().with_seed(42);
//! let result = model.cluster(&points, 2).unwrap();
//! assert_eq!(result.n_points(), 12);
//!
//! let search = model
//!     .find_optimal_k(&points, Some(4), &OptimalKOptions {
//!         method: SelectionMethod::Silhouette,
//!         ..Default::default()
//!     })
//!     .unwrap();
//! assert_eq!(search.optimal_k, 2);
//! ```

pub mod cluster;
pub mod distance;
/// Error types used across `cohort`.
pub mod error;
pub mod metrics;
pub mod point;
pub mod validate;

pub use cluster::{
    find_optimal_k, Cluster, ClusteringResult, Dendrogram, HierarchicalClustering,
    HierarchicalConfig, HierarchicalResult, InitMethod, KScore, Kmeans, KmeansConfig, Linkage,
    Merge, OptimalK, OptimalKOptions, Partition, SelectionMethod,
};
pub use distance::euclidean_distance;
pub use error::{Error, ErrorKind, NumericError, Result};
pub use metrics::{silhouette_samples, silhouette_score};
pub use point::{DataPoint, Metadata};
