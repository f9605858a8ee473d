//! Word n-gram ("shingle") filter.
//!
//! Emits every contiguous run of `min_size..=max_size` tokens as a single
//! space-joined token. With `(1, 2)` the stream `[data, science, python]`
//! becomes `[data, science, python, data science, science python]`:
//! all unigrams first, then all bigrams, each group in stream order.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::{CareerLensError, Result};

/// Produces word n-grams over a token stream.
#[derive(Clone, Debug)]
pub struct ShingleFilter {
    min_size: usize,
    max_size: usize,
}

impl ShingleFilter {
    /// Create a filter emitting n-grams with `min_size <= n <= max_size`.
    pub fn new(min_size: usize, max_size: usize) -> Result<Self> {
        if min_size == 0 || min_size > max_size {
            return Err(CareerLensError::analysis(format!(
                "Invalid n-gram range ({min_size}, {max_size})"
            )));
        }
        Ok(ShingleFilter { min_size, max_size })
    }

    /// The `(min, max)` n-gram range.
    pub fn range(&self) -> (usize, usize) {
        (self.min_size, self.max_size)
    }
}

impl Filter for ShingleFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let words: Vec<Token> = tokens.collect();
        let mut output = Vec::new();

        for n in self.min_size..=self.max_size {
            if n > words.len() {
                break;
            }
            for window in words.windows(n) {
                if n == 1 {
                    output.push(window[0].clone());
                    continue;
                }
                let text = window
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                let first = &window[0];
                let last = &window[n - 1];
                output.push(
                    Token::with_offsets(text, first.position, first.start_offset, last.end_offset)
                        .with_position_length(n),
                );
            }
        }

        Ok(Box::new(output.into_iter()))
    }

    fn name(&self) -> &'static str {
        "shingle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(filter: &ShingleFilter, words: &[&str]) -> Vec<String> {
        let tokens: Vec<Token> = words
            .iter()
            .enumerate()
            .map(|(i, w)| Token::new(*w, i))
            .collect();
        filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_unigrams_and_bigrams() {
        let filter = ShingleFilter::new(1, 2).unwrap();
        assert_eq!(
            texts(&filter, &["data", "science", "python"]),
            vec![
                "data",
                "science",
                "python",
                "data science",
                "science python"
            ]
        );
    }

    #[test]
    fn test_single_word_has_no_bigram() {
        let filter = ShingleFilter::new(1, 2).unwrap();
        assert_eq!(texts(&filter, &["nurse"]), vec!["nurse"]);
        assert!(texts(&filter, &[]).is_empty());
    }

    #[test]
    fn test_bigram_position_length() {
        let filter = ShingleFilter::new(2, 2).unwrap();
        let tokens = vec![
            Token::with_offsets("big", 0, 0, 3),
            Token::with_offsets("data", 1, 4, 8),
        ];
        let out: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "big data");
        assert_eq!(out[0].position_length, 2);
        assert_eq!(out[0].end_offset, 8);
    }

    #[test]
    fn test_invalid_range() {
        assert!(ShingleFilter::new(0, 2).is_err());
        assert!(ShingleFilter::new(3, 2).is_err());
    }
}
