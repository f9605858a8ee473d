//! Bidirectional mapping between label strings and class indices.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CareerLensError, Result};
use crate::storage::{read_blob, write_blob};

/// Label codec.
///
/// Class indices follow the lexicographic (byte) order of the unique
/// labels, so the mapping depends only on the label set and not on row
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCodec {
    classes: Vec<String>,
}

impl LabelCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the label space from every label in the training set.
    pub fn fit<S: AsRef<str>>(&mut self, labels: &[S]) -> Result<()> {
        if labels.is_empty() {
            return Err(CareerLensError::invalid_input(
                "cannot fit label codec on an empty label set",
            ));
        }
        let unique: BTreeSet<&str> = labels.iter().map(|l| l.as_ref()).collect();
        self.classes = unique.into_iter().map(str::to_string).collect();
        Ok(())
    }

    /// Class index of a label.
    pub fn encode(&self, label: &str) -> Result<usize> {
        self.ensure_fitted()?;
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .map_err(|_| {
                CareerLensError::unknown_label(format!("'{label}' was not seen during fit"))
            })
    }

    /// Encode a sequence of labels.
    pub fn encode_all<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>> {
        labels.iter().map(|l| self.encode(l.as_ref())).collect()
    }

    /// Label of a class index.
    pub fn decode(&self, index: usize) -> Result<&str> {
        self.ensure_fitted()?;
        self.classes.get(index).map(String::as_str).ok_or_else(|| {
            CareerLensError::unknown_label(format!(
                "class index {index} out of range for {} labels",
                self.classes.len()
            ))
        })
    }

    /// All labels in index order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.ensure_fitted()?;
        write_blob(path, self)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let codec: LabelCodec = read_blob(path)?;
        if codec.classes.windows(2).any(|w| w[0] >= w[1]) {
            return Err(CareerLensError::serialization(
                "label codec classes are not strictly ordered",
            ));
        }
        Ok(codec)
    }

    fn ensure_fitted(&self) -> Result<()> {
        if self.classes.is_empty() {
            Err(CareerLensError::not_fitted("label codec must be fitted first"))
        } else {
            Ok(())
        }
    }
}
