//! Training orchestration: normalize, encode, vectorize, fit, evaluate,
//! persist.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::{ModelKind, TrainingConfig};
use crate::dataset::{SchemaNormalizer, Table, TrainingRow};
use crate::error::{CareerLensError, Result};
use crate::ml::classifier::Classifier;
use crate::ml::label_codec::LabelCodec;
use crate::ml::model::{ClassifierArtifact, ClassifierModel, ModelMetadata};
use crate::ml::split::train_holdout_split;
use crate::ml::tfidf::TfIdfVectorizer;
use crate::pipeline::artifact::{ArtifactBundle, ArtifactPaths};

/// Summary of a training run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub model: ModelKind,
    pub rows: usize,
    pub classes: usize,
    pub vocabulary_size: usize,
    pub train_examples: usize,
    pub holdout_examples: usize,
    /// Holdout accuracy; `None` when there was no holdout.
    pub validation_accuracy: Option<f64>,
    pub elapsed_ms: u128,
}

impl TrainingReport {
    pub fn accuracy_display(&self) -> String {
        match self.validation_accuracy {
            Some(accuracy) => format!("{accuracy:.4}"),
            None => "unavailable".to_string(),
        }
    }
}

/// Runs the full training pipeline under one configuration.
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainingConfig,
    normalizer: SchemaNormalizer,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Trainer {
            config,
            normalizer: SchemaNormalizer::new(),
        })
    }

    pub fn with_normalizer(mut self, normalizer: SchemaNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train on a CSV dataset and write the three artifacts to `paths`,
    /// overwriting whatever is there.
    pub fn run<P: AsRef<Path>>(
        &self,
        dataset: P,
        text_columns: Option<&[String]>,
        label_column: Option<&str>,
        paths: &ArtifactPaths,
    ) -> Result<TrainingReport> {
        let dataset = dataset.as_ref();
        let table = Table::from_csv_path(dataset)?;
        info!(
            path = %dataset.display(),
            rows = table.len(),
            columns = %table.describe_columns(),
            "loaded dataset"
        );

        let rows = self.normalizer.normalize(&table, text_columns, label_column)?;
        if rows.is_empty() {
            return Err(CareerLensError::schema(format!(
                "no usable rows after normalization; columns: {}",
                table.describe_columns()
            )));
        }

        let (bundle, report) = self.fit_rows(&rows)?;
        bundle.save(paths)?;
        info!(
            model = %paths.model.display(),
            vectorizer = %paths.vectorizer.display(),
            label_encoder = %paths.label_encoder.display(),
            "saved artifacts"
        );
        Ok(report)
    }

    /// Fit extractor, codec and classifier on normalized rows.
    pub fn fit_rows(&self, rows: &[TrainingRow]) -> Result<(ArtifactBundle, TrainingReport)> {
        if rows.is_empty() {
            return Err(CareerLensError::invalid_input("no training rows"));
        }
        let started = Instant::now();
        let texts: Vec<&str> = rows.iter().map(|row| row.text.as_str()).collect();
        let labels: Vec<&str> = rows.iter().map(|row| row.label.as_str()).collect();

        let mut codec = LabelCodec::new();
        codec.fit(&labels)?;
        let encoded = codec.encode_all(&labels)?;
        info!(classes = codec.len(), "encoded labels");

        let mut vectorizer = TfIdfVectorizer::new(self.config.vectorizer_config())?;
        let features = vectorizer.fit_transform(&texts)?;

        let split = train_holdout_split(rows.len(), self.config.test_size, self.config.seed)?;
        let train_x = gather(&features, &split.train);
        let train_y = gather(&encoded, &split.train);

        let mut model = ClassifierModel::from_config(&self.config);
        model.fit(&train_x, &train_y, codec.len())?;

        let validation_accuracy = if split.holdout.is_empty() {
            warn!(rows = rows.len(), "too few rows for a holdout; accuracy unavailable");
            None
        } else {
            let holdout_x = gather(&features, &split.holdout);
            let holdout_y = gather(&encoded, &split.holdout);
            Some(model.score(&holdout_x, &holdout_y)?)
        };

        let report = TrainingReport {
            model: model.kind(),
            rows: rows.len(),
            classes: codec.len(),
            vocabulary_size: vectorizer.vocabulary_size(),
            train_examples: split.train.len(),
            holdout_examples: split.holdout.len(),
            validation_accuracy,
            elapsed_ms: started.elapsed().as_millis(),
        };
        info!(
            model = model.name(),
            train = report.train_examples,
            holdout = report.holdout_examples,
            accuracy = %report.accuracy_display(),
            "training finished"
        );

        let mut validation_metrics = BTreeMap::new();
        if let Some(accuracy) = validation_accuracy {
            validation_metrics.insert("accuracy".to_string(), accuracy);
        }
        let classifier = ClassifierArtifact {
            metadata: ModelMetadata {
                name: model.name().to_string(),
                version: crate::VERSION.to_string(),
                trained_at: chrono::Utc::now(),
                training_examples: split.train.len(),
                holdout_examples: split.holdout.len(),
                hyperparameters: self.hyperparameters(),
                validation_metrics,
            },
            model,
        };

        Ok((ArtifactBundle::new(vectorizer, codec, classifier)?, report))
    }

    fn hyperparameters(&self) -> BTreeMap<String, f64> {
        let config = &self.config;
        let mut params = BTreeMap::new();
        params.insert("test_size".to_string(), config.test_size);
        params.insert("seed".to_string(), config.seed as f64);
        params.insert("ngram_min".to_string(), config.ngram_range.0 as f64);
        params.insert("ngram_max".to_string(), config.ngram_range.1 as f64);
        if let Some(max_features) = config.max_features {
            params.insert("max_features".to_string(), max_features as f64);
        }
        if config.model == ModelKind::Logistic {
            params.insert("c".to_string(), config.c);
            params.insert("max_iter".to_string(), config.max_iter as f64);
            params.insert("tolerance".to_string(), config.tolerance);
            params.insert("learning_rate".to_string(), config.learning_rate);
        }
        params
    }
}

fn gather<T: Clone>(items: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| items[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CAREER_CSV: &str = "\
Education,Skills,Interests,Recommended_Career
Graduate,Python;SQL,Data Science,Data Scientist
Masters,Statistics;Python,Machine Learning,Data Scientist
Graduate,SQL;Analytics,Data,Data Scientist
Bachelors,Python;Pandas,Research,Data Scientist
Diploma,Patient Care,Healthcare,Nurse
Bachelors,Clinical Nursing,Hospital,Nurse
Diploma,First Aid;Patient Care,Helping People,Nurse
Bachelors,Nursing,Healthcare,Nurse
";

    fn write_dataset(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("careers.csv");
        std::fs::write(&path, CAREER_CSV).unwrap();
        path
    }

    #[test]
    fn test_run_writes_artifacts() {
        let dir = TempDir::new().unwrap();
        let dataset = write_dataset(&dir);
        let paths = ArtifactPaths::in_dir(dir.path().join("models"));

        let trainer = Trainer::new(TrainingConfig::default()).unwrap();
        let report = trainer.run(&dataset, None, None, &paths).unwrap();

        assert_eq!(report.rows, 8);
        assert_eq!(report.classes, 2);
        // ceil(8 * 0.15) = 2
        assert_eq!(report.holdout_examples, 2);
        assert_eq!(report.train_examples, 6);
        let accuracy = report.validation_accuracy.unwrap();
        assert!((0.0..=1.0).contains(&accuracy));
        assert!(paths.missing().is_empty());

        let bundle = ArtifactBundle::load(&paths).unwrap().unwrap();
        assert_eq!(bundle.codec.classes(), &["Data Scientist", "Nurse"]);
        assert_eq!(bundle.classifier.metadata.holdout_examples, 2);
    }

    #[test]
    fn test_run_is_reproducible() {
        let dir = TempDir::new().unwrap();
        let dataset = write_dataset(&dir);
        let trainer = Trainer::new(TrainingConfig::default()).unwrap();

        let first = ArtifactPaths::in_dir(dir.path().join("a"));
        let second = ArtifactPaths::in_dir(dir.path().join("b"));
        trainer.run(&dataset, None, None, &first).unwrap();
        trainer.run(&dataset, None, None, &second).unwrap();

        let a = ArtifactBundle::load(&first).unwrap().unwrap();
        let b = ArtifactBundle::load(&second).unwrap().unwrap();
        assert_eq!(a.classifier.model, b.classifier.model);
        assert_eq!(a.codec, b.codec);
    }

    #[test]
    fn test_schema_error_lists_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("one.csv");
        std::fs::write(&path, "only\n1\n2\n").unwrap();

        let trainer = Trainer::new(TrainingConfig::default()).unwrap();
        let err = trainer
            .run(&path, None, None, &ArtifactPaths::in_dir(dir.path()))
            .unwrap_err();
        assert!(matches!(err, CareerLensError::Schema(_)));
        assert!(err.to_string().contains("only"));
    }

    #[test]
    fn test_single_row_has_no_holdout() {
        let rows = vec![TrainingRow::new("Python", "Data Scientist").unwrap()];
        let trainer = Trainer::new(TrainingConfig::default()).unwrap();
        let (_, report) = trainer.fit_rows(&rows).unwrap();

        assert_eq!(report.holdout_examples, 0);
        assert!(report.validation_accuracy.is_none());
        assert_eq!(report.accuracy_display(), "unavailable");
    }
}
