//! K-means clustering.
//!
//! Partitions data into k clusters by minimizing **within-cluster sum of squares**
//! (WCSS, reported here as *inertia*).
//!
//! # Lloyd's Algorithm
//!
//! 1. Seed k centroids (random sample or k-means++)
//! 2. **Assign**: Each point → nearest centroid (ties → lowest centroid index)
//! 3. **Update**: Each centroid → mean of assigned points
//! 4. Stop once total inertia changes by less than `tolerance`, or after
//!    `max_iterations` passes
//!
//! Inertia is non-increasing across iterations: the assignment step can only
//! lower each point's distance, and the mean minimizes squared distance for a
//! fixed assignment.
//!
//! # Empty Clusters
//!
//! A centroid that attracts no points keeps its previous position. It is not
//! re-seeded and it is not dropped: the result still holds k clusters, some
//! possibly empty. Persistently empty clusters mean k is too large.
//!
//! ## K-means++ Initialization
//!
//! 1. Choose first centroid uniformly at random
//! 2. Choose next centroid with probability proportional to D(x)²
//!    (squared distance to nearest existing centroid)
//!
//! Provides provable O(log k) approximation to optimal WCSS, and is the
//! better choice whenever result quality matters.

use super::traits::Partition;
use super::{mean_vector, Cluster};
use crate::distance::squared_euclidean_view;
use crate::error::{Error, NumericError, Result};
use crate::metrics::{cluster_inertia, silhouette_score};
use crate::point::DataPoint;
use crate::validate::{validate_k, validate_points};
use ndarray::{Array2, ArrayView1};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How initial centroids are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InitMethod {
    /// Shuffle the points and take the first k.
    #[default]
    #[serde(rename = "random")]
    Random,
    /// D²-weighted sampling.
    #[serde(rename = "kmeans++")]
    KmeansPlusPlus,
}

/// Tunable parameters for [`Kmeans`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KmeansConfig {
    /// Maximum refinement passes.
    pub max_iterations: usize,
    /// Stop once |Δ total inertia| falls below this.
    pub tolerance: f64,
    /// Seeding strategy.
    pub init: InitMethod,
    /// Random seed for reproducibility. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Run the per-point dimensionality scan before clustering.
    pub validate_input: bool,
    /// Compute the silhouette score of the final partition (O(n²)).
    pub silhouette: bool,
}

impl Default for KmeansConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-4,
            init: InitMethod::Random,
            seed: None,
            validate_input: true,
            silhouette: true,
        }
    }
}

/// Output of one k-means run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringResult {
    /// Exactly k clusters; some may be empty.
    pub clusters: Vec<Cluster>,
    /// Sum of per-cluster inertia.
    pub total_inertia: f64,
    /// Refinement passes actually executed.
    pub iterations: usize,
    /// Whether the tolerance was met before the iteration cap.
    pub converged: bool,
    /// Silhouette of the final partition, if requested.
    pub silhouette_score: Option<f64>,
    /// Total inertia after each pass.
    pub inertia_history: Vec<f64>,
}

impl Partition for ClusteringResult {
    fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }
}

/// K-means clustering algorithm.
#[derive(Debug, Clone, Default)]
pub struct Kmeans {
    config: KmeansConfig,
}

impl Kmeans {
    /// Create a clusterer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clusterer from an explicit config.
    pub fn from_config(config: KmeansConfig) -> Self {
        Self { config }
    }

    /// Current settings.
    pub fn config(&self) -> &KmeansConfig {
        &self.config
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set convergence tolerance.
    pub fn with_tol(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Set the seeding strategy.
    pub fn with_init(mut self, init: InitMethod) -> Self {
        self.config.init = init;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Enable or disable the dimensionality scan.
    pub fn with_validate_input(mut self, validate: bool) -> Self {
        self.config.validate_input = validate;
        self
    }

    /// Enable or disable the final silhouette computation.
    pub fn with_silhouette(mut self, silhouette: bool) -> Self {
        self.config.silhouette = silhouette;
        self
    }

    /// Partition `points` into `k` clusters.
    pub fn cluster(&self, points: &[DataPoint], k: usize) -> Result<ClusteringResult> {
        let mut rng = self.make_rng(self.config.seed);
        self.cluster_with_rng(points, k, &mut rng)
    }

    /// Partition `points` into `k` clusters, drawing randomness from `rng`.
    #[instrument(skip_all, fields(n_points = points.len(), k = k, init = ?self.config.init))]
    pub fn cluster_with_rng<R: Rng>(
        &self,
        points: &[DataPoint],
        k: usize,
        rng: &mut R,
    ) -> Result<ClusteringResult> {
        // Constant-time checks always run; only the O(n·d) scan is optional.
        if points.is_empty() {
            return Err(Error::EmptyInput);
        }
        validate_k(k, points.len())?;
        self.check_params()?;
        if self.config.validate_input {
            validate_points(points)?;
        }

        self.run(points, k, rng).map_err(Error::computation("k-means"))
    }

    pub(crate) fn make_rng(&self, seed: Option<u64>) -> StdRng {
        match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }

    fn check_params(&self) -> Result<()> {
        if self.config.max_iterations == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iterations",
                message: "must be at least 1",
            });
        }
        if !self.config.tolerance.is_finite() || self.config.tolerance < 0.0 {
            return Err(Error::InvalidParameter {
                name: "tolerance",
                message: "must be finite and non-negative",
            });
        }
        Ok(())
    }

    fn run<R: Rng>(
        &self,
        points: &[DataPoint],
        k: usize,
        rng: &mut R,
    ) -> std::result::Result<ClusteringResult, NumericError> {
        let n = points.len();
        let d = points[0].dim();

        let mut flat: Vec<f32> = Vec::with_capacity(n * d);
        for (index, p) in points.iter().enumerate() {
            if p.dim() != d {
                return Err(NumericError::RaggedRow {
                    index,
                    expected: d,
                    found: p.dim(),
                });
            }
            flat.extend_from_slice(&p.vector);
        }
        let data = Array2::from_shape_vec((n, d), flat)?;

        let mut centroids = match self.config.init {
            InitMethod::Random => init_random(&data, k, rng),
            InitMethod::KmeansPlusPlus => init_plus_plus(&data, k, rng),
        };
        let mut labels = vec![0usize; n];
        let mut history = Vec::new();
        let mut prev = f64::INFINITY;
        let mut converged = false;

        for iteration in 1..=self.config.max_iterations {
            assign(&data, &centroids, &mut labels);
            update(&data, &labels, &mut centroids);

            let inertia: f64 = (0..n)
                .map(|i| squared_euclidean_view(data.row(i), centroids.row(labels[i])))
                .sum();
            if !inertia.is_finite() {
                return Err(NumericError::NonFinite {
                    quantity: "inertia",
                    iteration,
                });
            }
            debug!(iteration, inertia, "k-means pass");
            history.push(inertia);

            if (prev - inertia).abs() < self.config.tolerance {
                converged = true;
                break;
            }
            prev = inertia;
        }

        let iterations = history.len();
        if converged {
            info!(iterations, "k-means converged");
        } else {
            warn!(iterations, "k-means hit the iteration cap before converging");
        }

        let clusters = build_clusters(points, &labels, &centroids);
        let empty = clusters.iter().filter(|c| c.is_empty()).count();
        if empty > 0 {
            warn!(empty, k, "k-means finished with empty clusters; consider a smaller k");
        }

        let silhouette = self.config.silhouette.then(|| {
            let vectors: Vec<&[f32]> = points.iter().map(|p| p.vector.as_slice()).collect();
            silhouette_score(&vectors, &labels, k)
        });

        Ok(ClusteringResult {
            total_inertia: clusters.iter().map(|c| c.inertia).sum(),
            clusters,
            iterations,
            converged,
            silhouette_score: silhouette,
            inertia_history: history,
        })
    }
}

/// Shuffle point indices and take the first k rows.
fn init_random<R: Rng>(data: &Array2<f32>, k: usize, rng: &mut R) -> Array2<f32> {
    let n = data.nrows();
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);

    let mut centroids = Array2::zeros((k, data.ncols()));
    for c in 0..k {
        centroids.row_mut(c).assign(&data.row(order[c % n]));
    }
    centroids
}

/// K-means++ seeding.
fn init_plus_plus<R: Rng>(data: &Array2<f32>, k: usize, rng: &mut R) -> Array2<f32> {
    let n = data.nrows();
    let mut centroids = Array2::zeros((k, data.ncols()));

    // First centroid: random point
    let first = rng.random_range(0..n);
    centroids.row_mut(0).assign(&data.row(first));

    // Squared distance to the nearest chosen centroid, updated incrementally.
    let mut nearest: Vec<f64> = (0..n)
        .map(|j| squared_euclidean_view(data.row(j), centroids.row(0)))
        .collect();

    for c in 1..k {
        let total: f64 = nearest.iter().sum();
        let selected = if total > 0.0 {
            let threshold = rng.random::<f64>() * total;
            let mut cumsum = 0.0;
            let mut selected = nearest.iter().rposition(|&d| d > 0.0).unwrap_or(0);
            for (j, &d) in nearest.iter().enumerate() {
                cumsum += d;
                if d > 0.0 && cumsum >= threshold {
                    selected = j;
                    break;
                }
            }
            selected
        } else {
            // Every point sits on a centroid already.
            rng.random_range(0..n)
        };

        centroids.row_mut(c).assign(&data.row(selected));
        for (j, d) in nearest.iter_mut().enumerate() {
            *d = d.min(squared_euclidean_view(data.row(j), centroids.row(c)));
        }
    }

    centroids
}

#[inline]
fn nearest_centroid(point: ArrayView1<'_, f32>, centroids: &Array2<f32>) -> usize {
    let mut best_cluster = 0;
    let mut best_dist = f64::INFINITY;
    for (c, centroid) in centroids.outer_iter().enumerate() {
        let dist = squared_euclidean_view(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best_cluster = c;
        }
    }
    best_cluster
}

fn assign(data: &Array2<f32>, centroids: &Array2<f32>, labels: &mut [usize]) {
    #[cfg(feature = "parallel")]
    labels.par_iter_mut().enumerate().for_each(|(i, label)| {
        *label = nearest_centroid(data.row(i), centroids);
    });

    #[cfg(not(feature = "parallel"))]
    for (i, label) in labels.iter_mut().enumerate() {
        *label = nearest_centroid(data.row(i), centroids);
    }
}

/// Move each centroid to the mean of its members; empty clusters stay put.
fn update(data: &Array2<f32>, labels: &[usize], centroids: &mut Array2<f32>) {
    let (k, d) = centroids.dim();
    let mut sums = Array2::<f64>::zeros((k, d));
    let mut counts = vec![0usize; k];

    for (i, &c) in labels.iter().enumerate() {
        for j in 0..d {
            sums[[c, j]] += data[[i, j]] as f64;
        }
        counts[c] += 1;
    }

    for c in 0..k {
        if counts[c] == 0 {
            continue;
        }
        for j in 0..d {
            centroids[[c, j]] = (sums[[c, j]] / counts[c] as f64) as f32;
        }
    }
}

fn build_clusters(points: &[DataPoint], labels: &[usize], centroids: &Array2<f32>) -> Vec<Cluster> {
    let k = centroids.nrows();
    let mut members: Vec<Vec<DataPoint>> = vec![Vec::new(); k];
    for (p, &c) in points.iter().zip(labels) {
        members[c].push(p.clone());
    }

    members
        .into_iter()
        .enumerate()
        .map(|(id, points)| {
            let centroid = if points.is_empty() {
                centroids.row(id).to_vec()
            } else {
                mean_vector(points.iter().map(|p| p.vector.as_slice()), centroids.ncols())
            };
            let inertia = cluster_inertia(points.iter().map(|p| p.vector.as_slice()), &centroid);
            Cluster {
                id,
                centroid,
                points,
                inertia,
            }
        })
        .collect()
}
