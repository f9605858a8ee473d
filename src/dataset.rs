//! Dataset loading and schema normalization.
//!
//! Arbitrary CSV schemas are mapped onto a uniform list of
//! [`TrainingRow`]s. Named dataset shapes are described by
//! [`SchemaPreset`] descriptors; anything else falls through to the generic
//! column detector in [`SchemaNormalizer`].

pub mod acquire;
pub mod export;
pub mod normalizer;
pub mod preset;
pub mod table;

use serde::{Deserialize, Serialize};

pub use acquire::DatasetFetcher;
pub use export::write_training_csv;
pub use normalizer::{ColumnSelection, SchemaNormalizer};
pub use preset::{SchemaPreset, TextColumns};
pub use table::{ColumnKind, Table};

/// Sentinel text used when a row has no usable text values.
pub const UNKNOWN_TEXT: &str = "unknown";

/// One normalized training example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRow {
    /// Concatenated profile text, never empty.
    pub text: String,
    /// Trimmed career label, never empty.
    pub label: String,
}

impl TrainingRow {
    /// Build a row, substituting [`UNKNOWN_TEXT`] for blank text.
    ///
    /// Returns `None` when the label is blank after trimming.
    pub fn new(text: &str, label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        let text = text.trim();
        let text = if text.is_empty() { UNKNOWN_TEXT } else { text };
        Some(TrainingRow {
            text: text.to_string(),
            label: label.to_string(),
        })
    }
}
