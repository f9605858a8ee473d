//! Prediction over a loaded artifact bundle.

use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use crate::dataset::UNKNOWN_TEXT;
use crate::error::{CareerLensError, Result};
use crate::ml::classifier::{Classifier, rank_top};
use crate::pipeline::artifact::{ArtifactBundle, ArtifactPaths};

/// Number of ranked labels returned per text unless asked otherwise.
pub const DEFAULT_TOP_K: usize = 3;

/// Ranked labels for one input text.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// The text as submitted.
    pub text: String,
    /// Best label first, with confidences in `[0, 1]`.
    pub top_labels: Vec<(String, f64)>,
    /// Probability of every label, when the classifier provides them.
    pub probs: Option<BTreeMap<String, f64>>,
}

impl PredictionResult {
    /// The single best label.
    pub fn label(&self) -> &str {
        self.top_labels
            .first()
            .map(|(label, _)| label.as_str())
            .unwrap_or(UNKNOWN_TEXT)
    }

    pub fn confidence(&self) -> f64 {
        self.top_labels.first().map(|(_, c)| *c).unwrap_or(0.0)
    }
}

/// Outcome of one item of a batch. A failed item leaves its siblings intact.
pub type ItemResult = Result<PredictionResult>;

/// Predict every text in `texts`, in input order.
///
/// Fails with [`CareerLensError::InvalidInput`] only for an empty batch;
/// per-text failures are reported in place.
pub fn predict<S: AsRef<str> + Sync>(
    bundle: &ArtifactBundle,
    texts: &[S],
    top_k: usize,
) -> Result<Vec<ItemResult>> {
    if texts.is_empty() {
        return Err(CareerLensError::invalid_input("provide at least one text"));
    }
    let top_k = top_k.max(1);
    debug!(batch = texts.len(), top_k, "predicting");

    Ok(texts
        .par_iter()
        .map(|text| predict_one(bundle, text.as_ref(), top_k))
        .collect())
}

fn predict_one(bundle: &ArtifactBundle, text: &str, top_k: usize) -> ItemResult {
    let trimmed = text.trim();
    let input = if trimmed.is_empty() {
        UNKNOWN_TEXT
    } else {
        trimmed
    };
    let features = bundle.vectorizer.transform_one(input)?;
    let model = &bundle.classifier.model;

    let (ranked, probs) = if model.supports_confidence() {
        let proba = model.predict_proba(&features)?;
        let mut probs = BTreeMap::new();
        for (idx, p) in proba.iter().enumerate() {
            probs.insert(bundle.codec.decode(idx)?.to_string(), *p);
        }
        (rank_top(&proba, top_k), Some(probs))
    } else {
        (model.predict_top(&features, top_k)?, None)
    };

    let top_labels = ranked
        .into_iter()
        .map(|(idx, confidence)| Ok((bundle.codec.decode(idx)?.to_string(), confidence)))
        .collect::<Result<Vec<_>>>()?;

    Ok(PredictionResult {
        text: text.to_string(),
        top_labels,
        probs,
    })
}

/// Immutable inference context: the bundle, if one could be loaded.
///
/// A missing bundle is a degraded state, not an error: the service stays
/// up, reports it through [`InferenceService::is_ready`] and rejects
/// predictions.
#[derive(Debug, Clone, Default)]
pub struct InferenceService {
    bundle: Option<Arc<ArtifactBundle>>,
}

impl InferenceService {
    pub fn new(bundle: Option<ArtifactBundle>) -> Self {
        InferenceService {
            bundle: bundle.map(Arc::new),
        }
    }

    /// Service without a model.
    pub fn unloaded() -> Self {
        Self::default()
    }

    /// Load artifacts from `paths`; missing files yield an unloaded service.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        Ok(Self::new(ArtifactBundle::load(paths)?))
    }

    pub fn is_ready(&self) -> bool {
        self.bundle.is_some()
    }

    pub fn bundle(&self) -> Option<&ArtifactBundle> {
        self.bundle.as_deref()
    }

    /// Predict a batch; see [`predict`].
    pub fn predict<S: AsRef<str> + Sync>(
        &self,
        texts: &[S],
        top_k: usize,
    ) -> Result<Vec<ItemResult>> {
        let bundle = self
            .bundle
            .as_deref()
            .ok_or_else(|| CareerLensError::artifact_missing("model not loaded"))?;
        predict(bundle, texts, top_k)
    }
}
