//! Nearest-centroid classifier using cosine similarity.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CareerLensError, Result};
use crate::ml::classifier::{Classifier, argmax, check_training_set};
use crate::ml::sparse::SparseVector;

/// Prototype classifier: each class is the mean of its training vectors and
/// a query takes the class of the most cosine-similar prototype.
///
/// It produces no calibrated confidence, so
/// [`Classifier::supports_confidence`] is false and top-k prediction
/// degrades to the single best class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NearestCentroidClassifier {
    centroids: Vec<Vec<f64>>,
    n_features: usize,
}

impl NearestCentroidClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cosine similarity of a query to every class prototype.
    pub fn similarities(&self, features: &SparseVector) -> Result<Vec<f64>> {
        if self.centroids.is_empty() {
            return Err(CareerLensError::not_fitted(
                "nearest-centroid classifier must be fitted before predict",
            ));
        }
        if features.dim() != self.n_features {
            return Err(CareerLensError::invalid_input(format!(
                "expected {} features, got {}",
                self.n_features,
                features.dim()
            )));
        }

        let query_norm = features.norm();
        Ok(self
            .centroids
            .iter()
            .map(|centroid| {
                let centroid_norm = centroid.iter().map(|x| x * x).sum::<f64>().sqrt();
                if query_norm == 0.0 || centroid_norm == 0.0 {
                    0.0
                } else {
                    features.dot(centroid) / (query_norm * centroid_norm)
                }
            })
            .collect())
    }
}

impl Classifier for NearestCentroidClassifier {
    fn fit(
        &mut self,
        features: &[SparseVector],
        labels: &[usize],
        n_classes: usize,
    ) -> Result<()> {
        let n_features = check_training_set(features, labels, n_classes)?;

        let mut sums = vec![vec![0.0; n_features]; n_classes];
        let mut counts = vec![0usize; n_classes];
        for (x, &y) in features.iter().zip(labels) {
            for (j, v) in x.iter() {
                sums[y][j] += v;
            }
            counts[y] += 1;
        }
        for (centroid, &count) in sums.iter_mut().zip(&counts) {
            if count > 0 {
                for v in centroid.iter_mut() {
                    *v /= count as f64;
                }
            }
        }

        self.centroids = sums;
        self.n_features = n_features;
        info!(
            classes = n_classes,
            features = n_features,
            "fitted nearest-centroid classifier"
        );
        Ok(())
    }

    fn predict(&self, features: &SparseVector) -> Result<usize> {
        let similarities = self.similarities(features)?;
        argmax(&similarities).ok_or_else(|| CareerLensError::not_fitted("model has no classes"))
    }

    fn supports_confidence(&self) -> bool {
        false
    }

    fn predict_proba(&self, _features: &SparseVector) -> Result<Vec<f64>> {
        Err(CareerLensError::other(
            "nearest-centroid classifier does not produce probabilities",
        ))
    }

    fn n_classes(&self) -> usize {
        self.centroids.len()
    }

    fn name(&self) -> &str {
        "nearest_centroid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(dim: usize, pairs: Vec<(usize, f64)>) -> SparseVector {
        let mut v = SparseVector::from_pairs(dim, pairs);
        v.normalize();
        v
    }

    #[test]
    fn test_nearest_centroid() {
        let x = vec![
            unit(3, vec![(0, 1.0)]),
            unit(3, vec![(0, 1.0), (1, 0.2)]),
            unit(3, vec![(2, 1.0)]),
        ];
        let y = vec![0, 0, 1];
        let mut model = NearestCentroidClassifier::new();
        model.fit(&x, &y, 2).unwrap();

        assert_eq!(model.predict(&unit(3, vec![(0, 1.0), (2, 0.1)])).unwrap(), 0);
        assert_eq!(model.predict(&unit(3, vec![(2, 1.0)])).unwrap(), 1);
        assert_eq!(model.score(&x, &y).unwrap(), 1.0);
    }

    #[test]
    fn test_top_k_falls_back_to_single_prediction() {
        let x = vec![unit(2, vec![(0, 1.0)]), unit(2, vec![(1, 1.0)])];
        let mut model = NearestCentroidClassifier::new();
        model.fit(&x, &[0, 1], 2).unwrap();

        assert!(!model.supports_confidence());
        assert_eq!(model.predict_top(&x[1], 3).unwrap(), vec![(1, 1.0)]);
    }

    #[test]
    fn test_zero_query_picks_first_class() {
        let x = vec![unit(2, vec![(0, 1.0)]), unit(2, vec![(1, 1.0)])];
        let mut model = NearestCentroidClassifier::new();
        model.fit(&x, &[1, 0], 2).unwrap();

        assert_eq!(model.predict(&SparseVector::zeros(2)).unwrap(), 0);
    }
}
