//! Choosing k for k-means.
//!
//! Runs k-means once per candidate k and picks a winner:
//!
//! - **Elbow**: the k where the inertia curve bends hardest. With inertias
//!   `I[0..m]` over the candidate range, `Δ[i] = I[i+1] - I[i]` and the bend
//!   at candidate `i + 1` is `|Δ[i+1] - Δ[i]|`.
//! - **Silhouette**: the k with the highest silhouette score.
//!
//! Candidate runs share nothing but the read-only input, so with the
//! `parallel` feature they run concurrently. Each candidate derives its own
//! seed from the configured one, which keeps the outcome identical either way.

use super::kmeans::Kmeans;
use crate::error::{Error, Result};
use crate::point::DataPoint;
use crate::validate::validate_points;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Rule used to pick k.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMethod {
    /// Maximum discrete second difference of inertia.
    #[default]
    Elbow,
    /// Highest silhouette score.
    Silhouette,
}

/// Options for [`Kmeans::find_optimal_k`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimalKOptions {
    /// Smallest k evaluated.
    pub min_k: usize,
    /// Selection rule.
    pub method: SelectionMethod,
}

impl Default for OptimalKOptions {
    fn default() -> Self {
        Self {
            min_k: 2,
            method: SelectionMethod::Elbow,
        }
    }
}

/// Quality numbers for one candidate k.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KScore {
    /// Candidate k.
    pub k: usize,
    /// Total inertia of the k-means run.
    pub inertia: f64,
    /// Silhouette score, present under [`SelectionMethod::Silhouette`].
    pub silhouette: Option<f64>,
}

/// Outcome of a k search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalK {
    /// Selected k.
    pub optimal_k: usize,
    /// One entry per candidate, ascending in k.
    pub scores: Vec<KScore>,
    /// Rule that picked `optimal_k`.
    pub method: SelectionMethod,
}

impl Kmeans {
    /// Search `min_k..=max_k` for the best k.
    ///
    /// `max_k` defaults to `min(10, n / 2)`. It is capped at `n` and raised to
    /// `min_k` when smaller, so at least one candidate always runs.
    #[instrument(skip_all, fields(n_points = points.len(), method = ?options.method))]
    pub fn find_optimal_k(
        &self,
        points: &[DataPoint],
        max_k: Option<usize>,
        options: &OptimalKOptions,
    ) -> Result<OptimalK> {
        if self.config().validate_input {
            validate_points(points)?;
        } else if points.is_empty() {
            return Err(Error::EmptyInput);
        }

        let n = points.len();
        let min_k = options.min_k;
        if min_k == 0 || min_k > n {
            return Err(Error::InvalidClusterCount {
                requested: min_k,
                n_items: n,
            });
        }
        let max_k = max_k.unwrap_or_else(|| (n / 2).min(10)).min(n).max(min_k);

        let want_silhouette = options.method == SelectionMethod::Silhouette;
        let base_seed = self.config().seed;
        let candidate = self
            .clone()
            .with_validate_input(false)
            .with_silhouette(want_silhouette);

        let evaluate = |k: usize| -> Result<KScore> {
            let mut rng = candidate.make_rng(base_seed.map(|s| s.wrapping_add(k as u64)));
            let result = candidate.cluster_with_rng(points, k, &mut rng)?;
            debug!(
                k,
                inertia = result.total_inertia,
                silhouette = ?result.silhouette_score,
                "candidate"
            );
            Ok(KScore {
                k,
                inertia: result.total_inertia,
                silhouette: result.silhouette_score,
            })
        };

        #[cfg(feature = "parallel")]
        let scores: Vec<KScore> = (min_k..=max_k)
            .into_par_iter()
            .map(evaluate)
            .collect::<Result<_>>()?;

        #[cfg(not(feature = "parallel"))]
        let scores: Vec<KScore> = (min_k..=max_k).map(evaluate).collect::<Result<_>>()?;

        let optimal_k = match options.method {
            SelectionMethod::Elbow => elbow(&scores),
            SelectionMethod::Silhouette => best_silhouette(&scores),
        };
        info!(optimal_k, candidates = scores.len(), "k search finished");

        Ok(OptimalK {
            optimal_k,
            scores,
            method: options.method,
        })
    }
}

/// [`Kmeans::find_optimal_k`] with default k-means settings.
pub fn find_optimal_k(
    points: &[DataPoint],
    max_k: Option<usize>,
    options: &OptimalKOptions,
) -> Result<OptimalK> {
    Kmeans::new().find_optimal_k(points, max_k, options)
}

fn elbow(scores: &[KScore]) -> usize {
    if scores.len() < 3 {
        return scores[0].k;
    }

    let deltas: Vec<f64> = scores.windows(2).map(|w| w[1].inertia - w[0].inertia).collect();
    let mut best = (scores[1].k, f64::NEG_INFINITY);
    for (i, w) in deltas.windows(2).enumerate() {
        let bend = (w[1] - w[0]).abs();
        if bend > best.1 {
            best = (scores[i + 1].k, bend);
        }
    }
    best.0
}

fn best_silhouette(scores: &[KScore]) -> usize {
    let mut best = (scores[0].k, f64::NEG_INFINITY);
    for s in scores {
        let value = s.silhouette.unwrap_or(f64::NEG_INFINITY);
        if value > best.1 {
            best = (s.k, value);
        }
    }
    best.0
}
