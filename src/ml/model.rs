//! Persisted classifier model and its metadata.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{ModelKind, TrainingConfig};
use crate::error::{CareerLensError, Result};
use crate::ml::centroid::NearestCentroidClassifier;
use crate::ml::classifier::Classifier;
use crate::ml::logistic::LogisticRegression;
use crate::ml::sparse::SparseVector;
use crate::storage::{read_blob, write_blob};

/// Every classifier that can be trained and persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClassifierModel {
    Logistic(LogisticRegression),
    NearestCentroid(NearestCentroidClassifier),
}

impl ClassifierModel {
    /// Unfitted model of the configured kind.
    pub fn from_config(config: &TrainingConfig) -> Self {
        match config.model {
            ModelKind::Logistic => ClassifierModel::Logistic(LogisticRegression::new(
                config.c,
                config.max_iter,
                config.tolerance,
                config.learning_rate,
            )),
            ModelKind::NearestCentroid => {
                ClassifierModel::NearestCentroid(NearestCentroidClassifier::new())
            }
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            ClassifierModel::Logistic(_) => ModelKind::Logistic,
            ClassifierModel::NearestCentroid(_) => ModelKind::NearestCentroid,
        }
    }

    fn inner(&self) -> &dyn Classifier {
        match self {
            ClassifierModel::Logistic(m) => m,
            ClassifierModel::NearestCentroid(m) => m,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Classifier {
        match self {
            ClassifierModel::Logistic(m) => m,
            ClassifierModel::NearestCentroid(m) => m,
        }
    }
}

impl Classifier for ClassifierModel {
    fn fit(
        &mut self,
        features: &[SparseVector],
        labels: &[usize],
        n_classes: usize,
    ) -> Result<()> {
        self.inner_mut().fit(features, labels, n_classes)
    }

    fn predict(&self, features: &SparseVector) -> Result<usize> {
        self.inner().predict(features)
    }

    fn supports_confidence(&self) -> bool {
        self.inner().supports_confidence()
    }

    fn predict_proba(&self, features: &SparseVector) -> Result<Vec<f64>> {
        self.inner().predict_proba(features)
    }

    fn n_classes(&self) -> usize {
        self.inner().n_classes()
    }

    fn name(&self) -> &str {
        self.inner().name()
    }
}

/// Model metadata for tracking model information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model name/identifier.
    pub name: String,
    /// Crate version that trained the model.
    pub version: String,
    /// Training timestamp.
    pub trained_at: chrono::DateTime<chrono::Utc>,
    /// Number of examples the model was fitted on.
    pub training_examples: usize,
    /// Number of held-out examples used for validation.
    pub holdout_examples: usize,
    /// Model hyperparameters.
    pub hyperparameters: BTreeMap<String, f64>,
    /// Performance metrics on the holdout set.
    pub validation_metrics: BTreeMap<String, f64>,
}

/// The classifier blob: weights plus how they were produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    pub metadata: ModelMetadata,
    pub model: ClassifierModel,
}

impl ClassifierArtifact {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if self.model.n_classes() == 0 {
            return Err(CareerLensError::not_fitted("cannot save an unfitted classifier"));
        }
        write_blob(path, self)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        read_blob(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fitted(kind: ModelKind) -> ClassifierModel {
        let config = TrainingConfig {
            model: kind,
            ..TrainingConfig::default()
        };
        let mut model = ClassifierModel::from_config(&config);
        let x = vec![
            SparseVector::from_pairs(2, vec![(0, 1.0)]),
            SparseVector::from_pairs(2, vec![(1, 1.0)]),
        ];
        model.fit(&x, &[0, 1], 2).unwrap();
        model
    }

    #[test]
    fn test_delegates_capability() {
        assert!(fitted(ModelKind::Logistic).supports_confidence());
        assert!(!fitted(ModelKind::NearestCentroid).supports_confidence());
        assert_eq!(fitted(ModelKind::NearestCentroid).kind(), ModelKind::NearestCentroid);
    }

    #[test]
    fn test_artifact_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.bin");
        let artifact = ClassifierArtifact {
            metadata: ModelMetadata {
                name: "logistic_regression".to_string(),
                version: crate::VERSION.to_string(),
                trained_at: chrono::Utc::now(),
                training_examples: 2,
                holdout_examples: 0,
                hyperparameters: BTreeMap::new(),
                validation_metrics: BTreeMap::new(),
            },
            model: fitted(ModelKind::Logistic),
        };

        artifact.save(&path).unwrap();
        assert_eq!(ClassifierArtifact::load(&path).unwrap(), artifact);
    }

    #[test]
    fn test_unfitted_artifact_is_rejected() {
        let dir = TempDir::new().unwrap();
        let artifact = ClassifierArtifact {
            metadata: ModelMetadata {
                name: "nearest_centroid".to_string(),
                version: crate::VERSION.to_string(),
                trained_at: chrono::Utc::now(),
                training_examples: 0,
                holdout_examples: 0,
                hyperparameters: BTreeMap::new(),
                validation_metrics: BTreeMap::new(),
            },
            model: ClassifierModel::NearestCentroid(NearestCentroidClassifier::new()),
        };

        assert!(artifact.save(dir.path().join("model.bin")).is_err());
    }
}
