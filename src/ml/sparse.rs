//! Sparse feature vectors.

use serde::{Deserialize, Serialize};

/// A sparse vector over a fixed-dimension feature space.
///
/// Indices are strictly increasing; explicit zeros are not stored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SparseVector {
    dim: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// Build from `(index, value)` pairs. Pairs are sorted; duplicate
    /// indices are summed and zeros dropped.
    ///
    /// # Panics
    ///
    /// Panics if an index is `>= dim`.
    pub fn from_pairs(dim: usize, mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.sort_by_key(|&(idx, _)| idx);
        let mut indices: Vec<usize> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f64> = Vec::with_capacity(pairs.len());
        for (idx, value) in pairs {
            assert!(idx < dim, "index {idx} out of bounds for dimension {dim}");
            if indices.last() == Some(&idx) {
                if let Some(last) = values.last_mut() {
                    *last += value;
                }
            } else {
                indices.push(idx);
                values.push(value);
            }
        }

        let (indices, values): (Vec<usize>, Vec<f64>) = indices
            .into_iter()
            .zip(values)
            .filter(|&(_, v)| v != 0.0)
            .unzip();
        SparseVector {
            dim,
            indices,
            values,
        }
    }

    /// An all-zero vector.
    pub fn zeros(dim: usize) -> Self {
        SparseVector {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Iterate over `(index, value)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Dot product with a dense vector of the same dimension.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.iter().map(|(idx, v)| v * dense[idx]).sum()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Scale to unit L2 norm. Zero vectors are left unchanged.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for v in &mut self.values {
                *v /= norm;
            }
        }
    }

    /// Expand into a dense vector.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for (idx, v) in self.iter() {
            dense[idx] = v;
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_sorts_and_merges() {
        let v = SparseVector::from_pairs(5, vec![(3, 1.0), (1, 2.0), (3, 0.5), (4, 0.0)]);

        assert_eq!(v.nnz(), 2);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![(1, 2.0), (3, 1.5)]);
        assert_eq!(v.to_dense(), vec![0.0, 2.0, 0.0, 1.5, 0.0]);
    }

    #[test]
    fn test_dot_and_normalize() {
        let mut v = SparseVector::from_pairs(3, vec![(0, 3.0), (2, 4.0)]);
        assert_eq!(v.dot(&[1.0, 10.0, 1.0]), 7.0);

        v.normalize();
        assert!((v.norm() - 1.0).abs() < 1e-12);
        assert!((v.iter().next().unwrap().1 - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_zero_vector_normalize() {
        let mut v = SparseVector::zeros(4);
        v.normalize();
        assert_eq!(v.nnz(), 0);
        assert_eq!(v.dim(), 4);
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_index() {
        SparseVector::from_pairs(2, vec![(2, 1.0)]);
    }
}
