//! TF-IDF vectorizer for text feature extraction.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::standard::StandardAnalyzer;
use crate::analysis::tokenizer::regex::DEFAULT_TOKEN_PATTERN;
use crate::error::{CareerLensError, Result};
use crate::ml::sparse::SparseVector;
use crate::storage::{read_blob, write_blob};

/// Tokenization and vocabulary options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// Keep only the most frequent terms; `None` keeps every term.
    pub max_features: Option<usize>,
    /// Inclusive word n-gram range.
    pub ngram_range: (usize, usize),
    /// Lowercase tokens before counting.
    pub lowercase: bool,
    /// Regex whose matches are tokens.
    pub token_pattern: String,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        VectorizerConfig {
            max_features: Some(20_000),
            ngram_range: (1, 2),
            lowercase: true,
            token_pattern: DEFAULT_TOKEN_PATTERN.to_string(),
        }
    }
}

/// TF-IDF vectorizer for text feature extraction.
///
/// Weights are raw term counts times smoothed IDF,
/// `ln((N + 1) / (df + 1)) + 1`, and each row is L2-normalized. Terms outside
/// the fitted vocabulary are ignored.
#[derive(Clone)]
pub struct TfIdfVectorizer {
    config: VectorizerConfig,
    /// Vocabulary: term -> column index, indices in lexicographic term order.
    vocabulary: BTreeMap<String, usize>,
    /// Inverse document frequency for each column.
    idf: Vec<f64>,
    /// Total number of documents seen during fitting.
    n_documents: usize,
    analyzer: Arc<dyn Analyzer>,
}

/// On-disk form; the analyzer is rebuilt from the config on load.
#[derive(Serialize, Deserialize)]
struct SerializableTfIdf {
    config: VectorizerConfig,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    n_documents: usize,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("config", &self.config)
            .field("vocabulary_size", &self.vocabulary.len())
            .field("n_documents", &self.n_documents)
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new(config: VectorizerConfig) -> Result<Self> {
        let analyzer = Arc::new(StandardAnalyzer::with_options(
            &config.token_pattern,
            config.lowercase,
            config.ngram_range,
        )?);
        Ok(Self {
            config,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
            n_documents: 0,
            analyzer,
        })
    }

    /// Fit the vocabulary and IDF weights on a corpus.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<()> {
        if documents.is_empty() {
            return Err(CareerLensError::invalid_input(
                "cannot fit vectorizer on an empty corpus",
            ));
        }

        let mut term_counts: AHashMap<String, usize> = AHashMap::new();
        let mut document_frequency: AHashMap<String, usize> = AHashMap::new();

        for doc in documents {
            let terms = self.terms(doc.as_ref())?;
            let mut unique: AHashSet<&str> = AHashSet::new();
            for term in &terms {
                *term_counts.entry(term.clone()).or_insert(0) += 1;
                unique.insert(term.as_str());
            }
            for term in unique {
                *document_frequency.entry(term.to_string()).or_insert(0) += 1;
            }
        }

        if term_counts.is_empty() {
            return Err(CareerLensError::invalid_input(
                "empty vocabulary; documents contain no tokens",
            ));
        }

        // Most frequent terms first, ties by term so selection is stable.
        let mut ranked: Vec<(String, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let observed = ranked.len();
        if let Some(limit) = self.config.max_features {
            ranked.truncate(limit);
        }

        let mut selected: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        selected.sort();

        let n = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(selected.len());
        for (idx, term) in selected.into_iter().enumerate() {
            let df = document_frequency.get(&term).copied().unwrap_or(0) as f64;
            // IDF = log((N + 1) / (df + 1)) + 1
            idf.push(((n + 1.0) / (df + 1.0)).ln() + 1.0);
            vocabulary.insert(term, idx);
        }

        self.n_documents = documents.len();
        self.vocabulary = vocabulary;
        self.idf = idf;

        info!(
            documents = self.n_documents,
            observed_terms = observed,
            vocabulary = self.vocabulary.len(),
            "fitted TF-IDF vectorizer"
        );
        Ok(())
    }

    /// Transform documents into TF-IDF vectors, preserving input order.
    pub fn transform<S: AsRef<str> + Sync>(&self, documents: &[S]) -> Result<Vec<SparseVector>> {
        self.ensure_fitted()?;
        documents
            .par_iter()
            .map(|doc| self.transform_one(doc.as_ref()))
            .collect()
    }

    /// Transform a single document.
    pub fn transform_one(&self, document: &str) -> Result<SparseVector> {
        self.ensure_fitted()?;

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.terms(document)? {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let pairs = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();
        let mut vector = SparseVector::from_pairs(self.vocabulary.len(), pairs);
        vector.normalize();
        Ok(vector)
    }

    /// Fit on the corpus, then transform it.
    pub fn fit_transform<S: AsRef<str> + Sync>(
        &mut self,
        documents: &[S],
    ) -> Result<Vec<SparseVector>> {
        self.fit(documents)?;
        self.transform(documents)
    }

    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Column index of a term, if it is in the vocabulary.
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// IDF weight of a column.
    pub fn idf(&self, index: usize) -> Option<f64> {
        self.idf.get(index).copied()
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    /// Persist the fitted state.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.ensure_fitted()?;
        let state = SerializableTfIdf {
            config: self.config.clone(),
            vocabulary: self.vocabulary.clone(),
            idf: self.idf.clone(),
            n_documents: self.n_documents,
        };
        write_blob(path, &state)
    }

    /// Load a vectorizer written by [`TfIdfVectorizer::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let state: SerializableTfIdf = read_blob(path)?;
        if state.vocabulary.len() != state.idf.len() {
            return Err(CareerLensError::serialization(format!(
                "vectorizer state is inconsistent: {} terms, {} idf weights",
                state.vocabulary.len(),
                state.idf.len()
            )));
        }
        let n_weights = state.idf.len();
        if let Some((term, idx)) = state.vocabulary.iter().find(|(_, idx)| **idx >= n_weights) {
            return Err(CareerLensError::serialization(format!(
                "vectorizer term '{term}' has index {idx}, only {n_weights} idf weights"
            )));
        }
        let mut vectorizer = Self::new(state.config)?;
        vectorizer.vocabulary = state.vocabulary;
        vectorizer.idf = state.idf;
        vectorizer.n_documents = state.n_documents;
        debug!(vocabulary = vectorizer.vocabulary.len(), "loaded vectorizer");
        Ok(vectorizer)
    }

    fn ensure_fitted(&self) -> Result<()> {
        if self.is_fitted() {
            Ok(())
        } else {
            Err(CareerLensError::not_fitted(
                "TF-IDF vectorizer must be fitted before transform",
            ))
        }
    }

    fn terms(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyzer.analyze(text)?.map(|token| token.text).collect())
    }
}
