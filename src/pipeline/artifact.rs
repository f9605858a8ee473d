//! Artifact locations and the loaded artifact bundle.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{CareerLensError, Result};
use crate::ml::classifier::Classifier;
use crate::ml::label_codec::LabelCodec;
use crate::ml::model::ClassifierArtifact;
use crate::ml::tfidf::TfIdfVectorizer;

pub const MODEL_FILE: &str = "model.bin";
pub const VECTORIZER_FILE: &str = "vectorizer.bin";
pub const LABEL_ENCODER_FILE: &str = "label_encoder.bin";
/// Subdirectory searched before the base directory.
pub const MODELS_SUBDIR: &str = "models";

/// Paths of the three artifact blobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub vectorizer: PathBuf,
    pub label_encoder: PathBuf,
}

impl ArtifactPaths {
    /// All three artifacts directly inside `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        ArtifactPaths {
            model: dir.join(MODEL_FILE),
            vectorizer: dir.join(VECTORIZER_FILE),
            label_encoder: dir.join(LABEL_ENCODER_FILE),
        }
    }

    /// Resolve each artifact independently: `<base>/models/<file>` when it
    /// exists, otherwise `<base>/<file>`.
    pub fn resolve<P: AsRef<Path>>(base: P) -> Self {
        let base = base.as_ref();
        let pick = |file: &str| {
            let preferred = base.join(MODELS_SUBDIR).join(file);
            if preferred.exists() {
                preferred
            } else {
                base.join(file)
            }
        };
        ArtifactPaths {
            model: pick(MODEL_FILE),
            vectorizer: pick(VECTORIZER_FILE),
            label_encoder: pick(LABEL_ENCODER_FILE),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        [
            self.model.as_path(),
            self.vectorizer.as_path(),
            self.label_encoder.as_path(),
        ]
        .into_iter()
    }

    /// Artifacts that do not exist on disk.
    pub fn missing(&self) -> Vec<&Path> {
        self.iter().filter(|path| !path.exists()).collect()
    }
}

/// Fitted extractor, codec and classifier, loaded together.
///
/// The bundle is immutable once built; servers share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub vectorizer: TfIdfVectorizer,
    pub codec: LabelCodec,
    pub classifier: ClassifierArtifact,
}

impl ArtifactBundle {
    /// Assemble a bundle, checking that the parts agree on the label space.
    pub fn new(
        vectorizer: TfIdfVectorizer,
        codec: LabelCodec,
        classifier: ClassifierArtifact,
    ) -> Result<Self> {
        if !vectorizer.is_fitted() {
            return Err(CareerLensError::not_fitted("vectorizer must be fitted first"));
        }
        if codec.len() != classifier.model.n_classes() {
            return Err(CareerLensError::serialization(format!(
                "label codec has {} classes but the classifier has {}",
                codec.len(),
                classifier.model.n_classes()
            )));
        }
        Ok(ArtifactBundle {
            vectorizer,
            codec,
            classifier,
        })
    }

    /// Load all three artifacts.
    ///
    /// Returns `Ok(None)` when any file is absent; a file that exists but
    /// cannot be decoded is an error.
    pub fn load(paths: &ArtifactPaths) -> Result<Option<Self>> {
        let missing = paths.missing();
        if !missing.is_empty() {
            for path in &missing {
                debug!(path = %path.display(), "artifact not found");
            }
            return Ok(None);
        }

        let vectorizer = TfIdfVectorizer::load(&paths.vectorizer)?;
        let codec = LabelCodec::load(&paths.label_encoder)?;
        let classifier = ClassifierArtifact::load(&paths.model)?;
        let bundle = ArtifactBundle::new(vectorizer, codec, classifier)?;

        info!(
            model = bundle.classifier.model.name(),
            classes = bundle.codec.len(),
            vocabulary = bundle.vectorizer.vocabulary_size(),
            trained_at = %bundle.classifier.metadata.trained_at,
            "loaded artifacts"
        );
        Ok(Some(bundle))
    }

    /// Write all three artifacts, overwriting existing files.
    pub fn save(&self, paths: &ArtifactPaths) -> Result<()> {
        self.vectorizer.save(&paths.vectorizer)?;
        self.codec.save(&paths.label_encoder)?;
        self.classifier.save(&paths.model)?;
        Ok(())
    }
}
