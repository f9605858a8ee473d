//! Classifier trait definition.

use std::cmp::Ordering;

use crate::error::{CareerLensError, Result};
use crate::ml::sparse::SparseVector;

/// Classifier trait.
///
/// Implementations map feature vectors to class indices in
/// `[0, n_classes)`. Models that can score every class report it through
/// [`Classifier::supports_confidence`]; callers check the capability rather
/// than probing `predict_proba` for errors.
pub trait Classifier: Send + Sync {
    /// Fit the model on feature vectors and their class indices.
    fn fit(&mut self, features: &[SparseVector], labels: &[usize], n_classes: usize)
    -> Result<()>;

    /// Predict the single most likely class index.
    fn predict(&self, features: &SparseVector) -> Result<usize>;

    /// Whether [`Classifier::predict_proba`] is available.
    fn supports_confidence(&self) -> bool;

    /// Probability of every class, summing to 1.
    ///
    /// Only meaningful when [`Classifier::supports_confidence`] is true.
    fn predict_proba(&self, features: &SparseVector) -> Result<Vec<f64>>;

    /// Number of classes the model was fitted on (0 before fit).
    fn n_classes(&self) -> usize;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;

    /// The `min(k, n_classes)` most likely classes, by descending
    /// confidence, ties broken by ascending class index.
    ///
    /// Models without confidence output return their single prediction with
    /// confidence 1.0, whatever `k` is.
    fn predict_top(&self, features: &SparseVector, k: usize) -> Result<Vec<(usize, f64)>> {
        if !self.supports_confidence() {
            return Ok(vec![(self.predict(features)?, 1.0)]);
        }
        Ok(rank_top(&self.predict_proba(features)?, k))
    }

    /// Fraction of samples predicted correctly.
    fn score(&self, features: &[SparseVector], labels: &[usize]) -> Result<f64> {
        if features.len() != labels.len() {
            return Err(CareerLensError::invalid_input(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if features.is_empty() {
            return Err(CareerLensError::invalid_input("cannot score an empty set"));
        }
        let mut correct = 0usize;
        for (x, &y) in features.iter().zip(labels) {
            if self.predict(x)? == y {
                correct += 1;
            }
        }
        Ok(correct as f64 / labels.len() as f64)
    }
}

/// Rank class scores: descending score, ties by ascending index, truncated
/// to `k`.
pub fn rank_top(scores: &[f64], k: usize) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked.truncate(k);
    ranked
}

/// Index of the largest score; the lowest index wins ties.
pub(crate) fn argmax(scores: &[f64]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (idx, &score)| match best {
            Some((_, top)) if top >= score => best,
            _ => Some((idx, score)),
        })
        .map(|(idx, _)| idx)
}

/// Validate `fit` arguments shared by every model.
pub(crate) fn check_training_set(
    features: &[SparseVector],
    labels: &[usize],
    n_classes: usize,
) -> Result<usize> {
    if features.is_empty() {
        return Err(CareerLensError::invalid_input("training set is empty"));
    }
    if features.len() != labels.len() {
        return Err(CareerLensError::invalid_input(format!(
            "{} feature rows but {} labels",
            features.len(),
            labels.len()
        )));
    }
    if n_classes == 0 {
        return Err(CareerLensError::invalid_input("n_classes must be positive"));
    }
    if let Some(&bad) = labels.iter().find(|&&y| y >= n_classes) {
        return Err(CareerLensError::invalid_input(format!(
            "label index {bad} out of range for {n_classes} classes"
        )));
    }
    let dim = features[0].dim();
    if features.iter().any(|x| x.dim() != dim) {
        return Err(CareerLensError::invalid_input(
            "feature vectors have different dimensions",
        ));
    }
    Ok(dim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_top_orders_and_truncates() {
        let ranked = rank_top(&[0.2, 0.5, 0.3], 2);
        assert_eq!(ranked, vec![(1, 0.5), (2, 0.3)]);
    }

    #[test]
    fn test_rank_top_ties_by_index() {
        let ranked = rank_top(&[0.25, 0.25, 0.5], 3);
        assert_eq!(ranked, vec![(2, 0.5), (0, 0.25), (1, 0.25)]);
    }

    #[test]
    fn test_rank_top_k_larger_than_classes() {
        assert_eq!(rank_top(&[1.0], 3).len(), 1);
        assert!(rank_top(&[0.4, 0.6], 0).is_empty());
    }

    #[test]
    fn test_argmax_prefers_lowest_index() {
        assert_eq!(argmax(&[0.1, 0.7, 0.7]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_check_training_set() {
        let x = vec![SparseVector::zeros(3), SparseVector::zeros(3)];
        assert_eq!(check_training_set(&x, &[0, 1], 2).unwrap(), 3);
        assert!(check_training_set(&x, &[0], 2).is_err());
        assert!(check_training_set(&x, &[0, 2], 2).is_err());
        assert!(check_training_set(&[], &[], 2).is_err());

        let mixed = vec![SparseVector::zeros(3), SparseVector::zeros(4)];
        assert!(check_training_set(&mixed, &[0, 0], 1).is_err());
    }
}
