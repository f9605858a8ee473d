//! Standard analyzer used by the TF-IDF vectorizer.
//!
//! # Pipeline
//!
//! 1. RegexTokenizer (`\b\w\w+\b` by default)
//! 2. LowercaseFilter (optional)
//! 3. ShingleFilter (unigrams and bigrams by default)

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::shingle::ShingleFilter;
use crate::analysis::tokenizer::regex::{DEFAULT_TOKEN_PATTERN, RegexTokenizer};
use crate::error::Result;

pub struct StandardAnalyzer {
    inner: PipelineAnalyzer,
}

impl StandardAnalyzer {
    /// Default pipeline: lowercased unigrams and bigrams.
    pub fn new() -> Result<Self> {
        Self::with_options(DEFAULT_TOKEN_PATTERN, true, (1, 2))
    }

    /// Build a pipeline from explicit tokenization options.
    pub fn with_options(
        token_pattern: &str,
        lowercase: bool,
        ngram_range: (usize, usize),
    ) -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::with_pattern(token_pattern)?);
        let mut analyzer = PipelineAnalyzer::new(tokenizer);
        if lowercase {
            analyzer = analyzer.add_filter(Arc::new(LowercaseFilter::new()));
        }
        analyzer = analyzer.add_filter(Arc::new(ShingleFilter::new(
            ngram_range.0,
            ngram_range.1,
        )?));

        Ok(StandardAnalyzer { inner: analyzer })
    }

    pub fn inner(&self) -> &PipelineAnalyzer {
        &self.inner
    }
}

impl Analyzer for StandardAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}

impl std::fmt::Debug for StandardAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StandardAnalyzer")
            .field("inner", &self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(analyzer: &StandardAnalyzer, text: &str) -> Vec<String> {
        analyzer.analyze(text).unwrap().map(|t| t.text).collect()
    }

    #[test]
    fn test_standard_analyzer() {
        let analyzer = StandardAnalyzer::new().unwrap();

        assert_eq!(
            terms(&analyzer, "Graduate Data-Science"),
            vec![
                "graduate",
                "data",
                "science",
                "graduate data",
                "data science"
            ]
        );
    }

    #[test]
    fn test_unigrams_only_without_lowercase() {
        let analyzer =
            StandardAnalyzer::with_options(DEFAULT_TOKEN_PATTERN, false, (1, 1)).unwrap();

        assert_eq!(terms(&analyzer, "BSc Python"), vec!["BSc", "Python"]);
    }

    #[test]
    fn test_invalid_ngram_range() {
        assert!(StandardAnalyzer::with_options(DEFAULT_TOKEN_PATTERN, true, (2, 1)).is_err());
    }
}
