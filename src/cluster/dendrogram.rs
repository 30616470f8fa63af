//! Merge history of agglomerative clustering.

use serde::{Deserialize, Serialize};

/// A dendrogram recording hierarchical cluster merges, in merge order.
///
/// Each merge combines two clusters into one, recording:
/// - Which clusters were merged (positions in the working list just before the merge)
/// - The linkage distance at which they merged
/// - The size of the resulting cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dendrogram {
    merges: Vec<Merge>,
    /// Number of original items.
    n_items: usize,
}

/// A single merge operation in the dendrogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Merge {
    /// Position of the first cluster in the pre-merge list (always the lower index).
    pub cluster1: usize,
    /// Position of the second cluster in the pre-merge list.
    pub cluster2: usize,
    /// Linkage distance at merge time.
    pub distance: f64,
    /// Member count of the merged cluster.
    pub size: usize,
}

impl Dendrogram {
    /// Create an empty dendrogram for n items.
    pub fn new(n_items: usize) -> Self {
        Self {
            merges: Vec::with_capacity(n_items.saturating_sub(1)),
            n_items,
        }
    }

    /// Record a merge operation.
    pub fn add_merge(&mut self, cluster1: usize, cluster2: usize, distance: f64, size: usize) {
        self.merges.push(Merge {
            cluster1,
            cluster2,
            distance,
            size,
        });
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges recorded.
    pub fn len(&self) -> usize {
        self.merges.len()
    }

    /// Whether no merge was recorded.
    pub fn is_empty(&self) -> bool {
        self.merges.is_empty()
    }

    /// Merges in the order they happened.
    pub fn entries(&self) -> &[Merge] {
        &self.merges
    }

    /// Iterate over merges.
    pub fn merges(&self) -> impl Iterator<Item = &Merge> {
        self.merges.iter()
    }

    /// Get the merge distances (for visualization).
    pub fn distances(&self) -> Vec<f64> {
        self.merges.iter().map(|m| m.distance).collect()
    }

    /// Whether merge distances never decrease.
    ///
    /// Always true for single, complete and average linkage. Ward distances
    /// can dip, which is expected.
    pub fn is_monotonic(&self) -> bool {
        self.merges.windows(2).all(|w| w[1].distance >= w[0].distance)
    }
}
