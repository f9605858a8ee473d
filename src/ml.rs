//! Feature extraction, label encoding and classifiers.
//!
//! # Architecture
//!
//! - [`TfIdfVectorizer`]: text to L2-normalized TF-IDF [`SparseVector`]s
//! - [`LabelCodec`]: label strings to dense class indices and back
//! - [`Classifier`] trait: common interface for all models
//! - [`LogisticRegression`]: multinomial linear model with probabilities
//! - [`NearestCentroidClassifier`]: prototype model without confidence output
//! - [`ClassifierModel`]: the persisted, tagged union of the models above

pub mod centroid;
pub mod classifier;
pub mod label_codec;
pub mod logistic;
pub mod model;
pub mod sparse;
pub mod split;
pub mod tfidf;

pub use centroid::NearestCentroidClassifier;
pub use classifier::{Classifier, rank_top};
pub use label_codec::LabelCodec;
pub use logistic::LogisticRegression;
pub use model::{ClassifierArtifact, ClassifierModel, ModelMetadata};
pub use sparse::SparseVector;
pub use split::{Split, train_holdout_split};
pub use tfidf::{TfIdfVectorizer, VectorizerConfig};
