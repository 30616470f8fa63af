//! Input records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque key-value bag carried alongside a vector.
///
/// Clustering never reads it; it is cloned into the result untouched.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// A single embedding to be clustered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Caller-supplied identifier. Uniqueness is not checked.
    pub id: String,
    /// Embedding vector.
    pub vector: Vec<f32>,
    /// Pass-through metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

impl DataPoint {
    /// Create a point with empty metadata.
    pub fn new(id: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            vector,
            metadata: Metadata::new(),
        }
    }

    /// Attach a metadata entry.
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Dimensionality of the vector.
    #[inline]
    pub fn dim(&self) -> usize {
        self.vector.len()
    }
}
