//! Training hyper-parameters and service configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::regex::DEFAULT_TOKEN_PATTERN;
use crate::error::{CareerLensError, Result};
use crate::ml::tfidf::VectorizerConfig;
use crate::pipeline::artifact::ArtifactPaths;

/// Default port of the HTTP prediction service.
pub const DEFAULT_PORT: u16 = 5000;

/// Which classifier to train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Multinomial logistic regression with class probabilities.
    #[default]
    Logistic,
    /// Cosine nearest-centroid; single label, no probabilities.
    NearestCentroid,
}

/// Training configuration. Every field has a default, so a JSON file only
/// needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Vocabulary cap (most frequent terms).
    pub max_features: Option<usize>,
    /// Inclusive word n-gram range.
    pub ngram_range: (usize, usize),
    pub lowercase: bool,
    pub token_pattern: String,
    /// Fraction of rows held out for validation accuracy.
    pub test_size: f64,
    /// Seed for the train/holdout shuffle.
    pub seed: u64,
    pub max_iter: usize,
    pub tolerance: f64,
    /// Inverse L2 regularization strength.
    pub c: f64,
    pub learning_rate: f64,
    pub model: ModelKind,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            max_features: Some(20_000),
            ngram_range: (1, 2),
            lowercase: true,
            token_pattern: DEFAULT_TOKEN_PATTERN.to_string(),
            test_size: 0.15,
            seed: 42,
            max_iter: 1000,
            tolerance: 1e-4,
            c: 1.0,
            learning_rate: 1.0,
            model: ModelKind::Logistic,
        }
    }
}

impl TrainingConfig {
    /// Load overrides from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TrainingConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.test_size) {
            return Err(CareerLensError::config(format!(
                "test_size must be in [0, 1), got {}",
                self.test_size
            )));
        }
        if self.c <= 0.0 {
            return Err(CareerLensError::config("c must be positive"));
        }
        if self.learning_rate <= 0.0 || self.learning_rate > 1.0 {
            return Err(CareerLensError::config("learning_rate must be in (0, 1]"));
        }
        if self.max_features == Some(0) {
            return Err(CareerLensError::config("max_features must be positive"));
        }
        Ok(())
    }

    pub fn vectorizer_config(&self) -> VectorizerConfig {
        VectorizerConfig {
            max_features: self.max_features,
            ngram_range: self.ngram_range,
            lowercase: self.lowercase,
            token_pattern: self.token_pattern.clone(),
        }
    }
}

/// Prediction service configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Directory searched for artifacts (its `models/` subdirectory first).
    pub base_dir: PathBuf,
}

impl ServiceConfig {
    /// Read `ML_HOST`, `ML_PORT` and `ML_MODELS_DIR`, loading `.env` if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let port = parse_port(std::env::var("ML_PORT").ok().as_deref())?;
        let base_dir = match std::env::var("ML_MODELS_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()?,
        };

        Ok(ServiceConfig {
            host: std::env::var("ML_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            base_dir,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| CareerLensError::config(format!("invalid listen address: {e}")))
    }

    /// Artifact locations, preferring the `models/` subdirectory.
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::resolve(&self.base_dir)
    }
}

/// Parse a raw `ML_PORT` value, defaulting when unset.
pub fn parse_port(raw: Option<&str>) -> Result<u16> {
    match raw.map(str::trim) {
        None => Ok(DEFAULT_PORT),
        Some(value) => value.parse::<u16>().map_err(|_| {
            CareerLensError::config(format!("ML_PORT must be a valid port number, got '{value}'"))
        }),
    }
}
