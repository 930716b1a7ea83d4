//! Flat L2 nearest-neighbor index over chunk embeddings.
//!
//! The index is rebuilt wholesale from every stored embedding on each
//! ingestion event and the previous index discarded; there is no
//! incremental insert or delete. Lookups are a brute-force scan with
//! squared-L2 distance, ascending.

use anyhow::{bail, Result};

/// A nearest-neighbor match: position into the chunk store plus distance.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f32,
}

pub struct FlatIndex {
    dim: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    /// Build an index from the full embedding matrix. All vectors must
    /// share one non-zero dimension.
    pub fn build(vectors: Vec<Vec<f32>>) -> Result<Self> {
        let Some(first) = vectors.first() else {
            bail!("Cannot build an index from zero embeddings");
        };
        let dim = first.len();
        if dim == 0 {
            bail!("Embedding dimension must be non-zero");
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
            bail!(
                "Inconsistent embedding dimensions: expected {dim}, got {}",
                bad.len()
            );
        }
        Ok(Self { dim, vectors })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Top-k nearest neighbors of `query`, closest first.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dim {
            bail!(
                "Query dimension {} does not match index dimension {}",
                query.len(),
                self.dim
            );
        }

        let mut scored: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, v)| Neighbor {
                position,
                distance: squared_l2(query, v),
            })
            .collect();

        scored.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);

        Ok(scored)
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rejects_empty_matrix() {
        assert!(FlatIndex::build(Vec::new()).is_err());
    }

    #[test]
    fn test_build_rejects_zero_dimension() {
        assert!(FlatIndex::build(vec![vec![]]).is_err());
    }

    #[test]
    fn test_build_rejects_mixed_dimensions() {
        let result = FlatIndex::build(vec![vec![1.0, 2.0], vec![1.0]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_search_orders_by_distance() {
        let index = FlatIndex::build(vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![5.0, 5.0],
        ])
        .unwrap();

        let hits = index.search(&[0.9, 0.0], 3).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].position, 1);
        assert_eq!(hits[1].position, 0);
        assert_eq!(hits[2].position, 2);
        assert!(hits[0].distance <= hits[1].distance);
    }

    #[test]
    fn test_search_clamps_k_to_entry_count() {
        let index = FlatIndex::build(vec![vec![1.0], vec![2.0]]).unwrap();
        let hits = index.search(&[0.0], 10).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_search_rejects_dimension_mismatch() {
        let index = FlatIndex::build(vec![vec![1.0, 2.0]]).unwrap();
        assert!(index.search(&[1.0], 1).is_err());
    }

    #[test]
    fn test_exact_match_has_zero_distance() {
        let index = FlatIndex::build(vec![vec![0.5, 0.5], vec![2.0, 2.0]]).unwrap();
        let hits = index.search(&[0.5, 0.5], 1).unwrap();
        assert_eq!(hits[0].position, 0);
        assert_eq!(hits[0].distance, 0.0);
    }
}
