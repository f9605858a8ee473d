//! Multinomial logistic regression.
//!
//! Minimizes the mean softmax cross-entropy plus an L2 penalty
//! `||W||^2 / (2 * C * n)` (the bias is not penalized), which has the same
//! minimizer as `C * sum(loss) + ||W||^2 / 2`. Optimization is full-batch
//! Nesterov-accelerated gradient descent from zero weights, so the fitted
//! weights are a pure function of the inputs and hyper-parameters.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CareerLensError, Result};
use crate::ml::classifier::{Classifier, argmax, check_training_set};
use crate::ml::sparse::SparseVector;

/// Multinomial logistic regression over sparse features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Inverse regularization strength.
    c: f64,
    max_iter: usize,
    /// Stop once the largest gradient component falls below this.
    tolerance: f64,
    /// Step size relative to the objective's smoothness bound (0, 1].
    learning_rate: f64,
    /// One weight row per class over the feature space.
    weights: Vec<Vec<f64>>,
    /// One bias per class.
    bias: Vec<f64>,
    n_features: usize,
    iterations: usize,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(1.0, 1000, 1e-4, 1.0)
    }
}

impl LogisticRegression {
    pub fn new(c: f64, max_iter: usize, tolerance: f64, learning_rate: f64) -> Self {
        LogisticRegression {
            c,
            max_iter,
            tolerance,
            learning_rate,
            weights: Vec::new(),
            bias: Vec::new(),
            n_features: 0,
            iterations: 0,
        }
    }

    /// Per-class weight rows.
    pub fn weights(&self) -> &[Vec<f64>] {
        &self.weights
    }

    /// Per-class bias terms.
    pub fn bias(&self) -> &[f64] {
        &self.bias
    }

    /// Gradient steps taken by the last fit.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn is_fitted(&self) -> bool {
        !self.weights.is_empty()
    }

    /// Mean cross-entropy of the fitted model on a labeled set.
    pub fn log_loss(&self, features: &[SparseVector], labels: &[usize]) -> Result<f64> {
        let mut total = 0.0;
        for (x, &y) in features.iter().zip(labels) {
            let probs = self.predict_proba(x)?;
            total -= probs[y].max(f64::MIN_POSITIVE).ln();
        }
        Ok(total / features.len().max(1) as f64)
    }

    fn ensure_fitted(&self, features: &SparseVector) -> Result<()> {
        if !self.is_fitted() {
            return Err(CareerLensError::not_fitted(
                "logistic regression must be fitted before predict",
            ));
        }
        if features.dim() != self.n_features {
            return Err(CareerLensError::invalid_input(format!(
                "expected {} features, got {}",
                self.n_features,
                features.dim()
            )));
        }
        Ok(())
    }
}

fn decision(weights: &[Vec<f64>], bias: &[f64], x: &SparseVector) -> Vec<f64> {
    weights
        .iter()
        .zip(bias)
        .map(|(row, b)| x.dot(row) + b)
        .collect()
}

fn softmax(mut scores: Vec<f64>) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for s in &mut scores {
        *s = (*s - max).exp();
        sum += *s;
    }
    for s in &mut scores {
        *s /= sum;
    }
    scores
}

/// Gradient of the regularized objective at `(weights, bias)`.
///
/// Probabilities are computed per sample in parallel; each class row is then
/// accumulated sequentially over samples, so results do not depend on
/// thread scheduling.
fn gradient(
    weights: &[Vec<f64>],
    bias: &[f64],
    features: &[SparseVector],
    labels: &[usize],
    reg: f64,
) -> (Vec<Vec<f64>>, Vec<f64>) {
    let n = features.len() as f64;
    let probs: Vec<Vec<f64>> = features
        .par_iter()
        .map(|x| softmax(decision(weights, bias, x)))
        .collect();

    let rows: Vec<(Vec<f64>, f64)> = (0..weights.len())
        .into_par_iter()
        .map(|k| {
            let mut grad: Vec<f64> = weights[k].iter().map(|w| w * reg).collect();
            let mut grad_bias = 0.0;
            for (i, x) in features.iter().enumerate() {
                let target = if labels[i] == k { 1.0 } else { 0.0 };
                let err = (probs[i][k] - target) / n;
                if err == 0.0 {
                    continue;
                }
                for (j, v) in x.iter() {
                    grad[j] += err * v;
                }
                grad_bias += err;
            }
            (grad, grad_bias)
        })
        .collect();

    rows.into_iter().unzip()
}

fn max_abs(grad: &[Vec<f64>], grad_bias: &[f64]) -> f64 {
    grad.iter()
        .flatten()
        .chain(grad_bias)
        .fold(0.0, |acc: f64, g| acc.max(g.abs()))
}

impl Classifier for LogisticRegression {
    fn fit(
        &mut self,
        features: &[SparseVector],
        labels: &[usize],
        n_classes: usize,
    ) -> Result<()> {
        let n_features = check_training_set(features, labels, n_classes)?;
        if self.c <= 0.0 || self.learning_rate <= 0.0 {
            return Err(CareerLensError::config(
                "C and learning_rate must be positive",
            ));
        }

        let n = features.len() as f64;
        let reg = 1.0 / (self.c * n);
        // Rows are L2-normalized, so with the bias column each sample has
        // squared norm <= 2 and the loss is 1-smooth; the penalty adds `reg`.
        let step = self.learning_rate / (1.0 + reg);

        let mut weights = vec![vec![0.0; n_features]; n_classes];
        let mut bias = vec![0.0; n_classes];
        let mut prev_weights = weights.clone();
        let mut prev_bias = bias.clone();
        let mut iterations = 0;

        for t in 1..=self.max_iter {
            iterations = t;
            let momentum = (t as f64 - 1.0) / (t as f64 + 2.0);

            let look_weights: Vec<Vec<f64>> = weights
                .iter()
                .zip(&prev_weights)
                .map(|(w, p)| {
                    w.iter()
                        .zip(p)
                        .map(|(w, p)| w + momentum * (w - p))
                        .collect()
                })
                .collect();
            let look_bias: Vec<f64> = bias
                .iter()
                .zip(&prev_bias)
                .map(|(b, p)| b + momentum * (b - p))
                .collect();

            let (grad, grad_bias) = gradient(&look_weights, &look_bias, features, labels, reg);
            let grad_norm = max_abs(&grad, &grad_bias);

            prev_weights = weights;
            prev_bias = bias;
            weights = look_weights
                .into_iter()
                .zip(&grad)
                .map(|(w, g)| w.iter().zip(g).map(|(w, g)| w - step * g).collect())
                .collect();
            bias = look_bias
                .iter()
                .zip(&grad_bias)
                .map(|(b, g)| b - step * g)
                .collect();

            if t % 100 == 0 {
                debug!(iteration = t, grad_norm, "logistic regression progress");
            }
            if grad_norm < self.tolerance {
                break;
            }
        }

        self.weights = weights;
        self.bias = bias;
        self.n_features = n_features;
        self.iterations = iterations;

        info!(
            classes = n_classes,
            features = n_features,
            samples = features.len(),
            iterations,
            "fitted logistic regression"
        );
        Ok(())
    }

    fn predict(&self, features: &SparseVector) -> Result<usize> {
        self.ensure_fitted(features)?;
        argmax(&decision(&self.weights, &self.bias, features))
            .ok_or_else(|| CareerLensError::not_fitted("model has no classes"))
    }

    fn supports_confidence(&self) -> bool {
        true
    }

    fn predict_proba(&self, features: &SparseVector) -> Result<Vec<f64>> {
        self.ensure_fitted(features)?;
        Ok(softmax(decision(&self.weights, &self.bias, features)))
    }

    fn n_classes(&self) -> usize {
        self.weights.len()
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two well-separated classes over four features.
    fn toy() -> (Vec<SparseVector>, Vec<usize>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..10 {
            let w = 1.0 + i as f64 * 0.1;
            let mut a = SparseVector::from_pairs(4, vec![(0, w), (1, 1.0)]);
            a.normalize();
            let mut b = SparseVector::from_pairs(4, vec![(2, w), (3, 1.0)]);
            b.normalize();
            x.push(a);
            y.push(0);
            x.push(b);
            y.push(1);
        }
        (x, y)
    }

    #[test]
    fn test_fits_separable_data() {
        let (x, y) = toy();
        let mut model = LogisticRegression::default();
        model.fit(&x, &y, 2).unwrap();

        assert_eq!(model.score(&x, &y).unwrap(), 1.0);
        assert!(model.log_loss(&x, &y).unwrap() < 0.6);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (x, y) = toy();
        let mut model = LogisticRegression::default();
        model.fit(&x, &y, 3).unwrap();

        let probs = model.predict_proba(&x[0]).unwrap();
        assert_eq!(probs.len(), 3);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
        // class 2 never occurs in training
        assert!(probs[2] < probs[0]);
    }

    #[test]
    fn test_predict_top() {
        let (x, y) = toy();
        let mut model = LogisticRegression::default();
        model.fit(&x, &y, 2).unwrap();

        let top = model.predict_top(&x[1], 5).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, 1);
        assert!(top[0].1 > top[1].1);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = toy();
        let mut a = LogisticRegression::default();
        a.fit(&x, &y, 2).unwrap();
        let mut b = LogisticRegression::default();
        b.fit(&x, &y, 2).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_single_class() {
        let (x, _) = toy();
        let y = vec![0; x.len()];
        let mut model = LogisticRegression::default();
        model.fit(&x, &y, 1).unwrap();

        assert_eq!(model.predict(&x[3]).unwrap(), 0);
        assert_eq!(model.predict_proba(&x[3]).unwrap(), vec![1.0]);
    }

    #[test]
    fn test_predict_before_fit_and_dimension_mismatch() {
        let model = LogisticRegression::default();
        assert!(matches!(
            model.predict(&SparseVector::zeros(4)).unwrap_err(),
            CareerLensError::NotFitted(_)
        ));

        let (x, y) = toy();
        let mut model = LogisticRegression::default();
        model.fit(&x, &y, 2).unwrap();
        assert!(matches!(
            model.predict(&SparseVector::zeros(7)).unwrap_err(),
            CareerLensError::InvalidInput(_)
        ));
    }
}
