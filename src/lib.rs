//! # CareerLens
//!
//! Career-label classification from free-text profiles.
//!
//! ## Features
//!
//! - Schema normalization of loosely structured CSV datasets into
//!   `(text, label)` rows, with declarative dataset presets
//! - TF-IDF word n-gram features built on a small analysis pipeline
//! - Multinomial logistic regression and a nearest-centroid baseline
//! - Persisted artifacts and top-k inference over JSON lines or HTTP

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod ml;
pub mod pipeline;
pub mod service;
pub mod storage;

pub mod prelude {
    pub use crate::config::{ModelKind, ServiceConfig, TrainingConfig};
    pub use crate::dataset::{SchemaNormalizer, Table, TrainingRow};
    pub use crate::error::{CareerLensError, Result};
    pub use crate::pipeline::{
        ArtifactBundle, ArtifactPaths, InferenceService, PredictionResult, Trainer,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
