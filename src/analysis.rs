//! Text analysis for feature extraction.
//!
//! Raw profile text flows through a tokenizer and a chain of token filters
//! before the TF-IDF vectorizer counts terms:
//!
//! ```text
//! "BSc Python, SQL" → RegexTokenizer → LowercaseFilter → ShingleFilter
//!                     [BSc, Python,    [bsc, python,     [bsc, python, sql,
//!                      SQL]             sql]              bsc python, python sql]
//! ```

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

// Re-export commonly used types
pub use analyzer::*;
pub use token::*;
pub use token_filter::*;
pub use tokenizer::*;
