//! Up-front input validation shared by both clusterers.
//!
//! This is the only place malformed input is rejected. Everything
//! downstream assumes a non-empty, rectangular set of points.

use crate::error::{Error, Result};
use crate::point::DataPoint;

/// Check that `points` is non-empty and rectangular. Returns the common dimension.
pub fn validate_points(points: &[DataPoint]) -> Result<usize> {
    let first = points.first().ok_or(Error::EmptyInput)?;
    let dim = first.dim();

    for (index, p) in points.iter().enumerate() {
        if p.vector.is_empty() {
            return Err(Error::EmptyVector { index });
        }
        if p.dim() != dim {
            return Err(Error::DimensionMismatch {
                index,
                expected: dim,
                found: p.dim(),
            });
        }
    }

    Ok(dim)
}

/// Check that `k` is in `1..=n_items`.
pub fn validate_k(k: usize, n_items: usize) -> Result<()> {
    if k == 0 || k > n_items {
        return Err(Error::InvalidClusterCount {
            requested: k,
            n_items,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(vectors: &[&[f32]]) -> Vec<DataPoint> {
        vectors
            .iter()
            .enumerate()
            .map(|(i, v)| DataPoint::new(format!("p{i}"), v.to_vec()))
            .collect()
    }

    #[test]
    fn test_accepts_rectangular_input() {
        let data = pts(&[&[0.0, 1.0], &[2.0, 3.0]]);
        assert_eq!(validate_points(&data).unwrap(), 2);
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(validate_points(&[]), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_rejects_zero_length_vector() {
        let data = pts(&[&[], &[]]);
        assert!(matches!(
            validate_points(&data),
            Err(Error::EmptyVector { index: 0 })
        ));
    }

    #[test]
    fn test_rejects_ragged() {
        let data = pts(&[&[0.0, 1.0], &[1.0, 1.0], &[2.0]]);
        assert!(matches!(
            validate_points(&data),
            Err(Error::DimensionMismatch {
                index: 2,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_k_range() {
        assert!(validate_k(1, 1).is_ok());
        assert!(validate_k(0, 5).is_err());
        assert!(validate_k(6, 5).is_err());
    }
}
