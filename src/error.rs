//! Error types for the CareerLens library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`CareerLensError`] enum. The variants follow the stages of the
//! classification pipeline: dataset normalization, fitting, inference and
//! artifact persistence.
//!
//! # Examples
//!
//! ```
//! use careerlens::error::{CareerLensError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(CareerLensError::invalid_input("provide `text` or `texts`"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for CareerLens operations.
#[derive(Error, Debug)]
pub enum CareerLensError {
    /// I/O errors (artifact read/write, dataset files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The normalizer could not determine usable text or label columns.
    #[error("Schema error: {0}")]
    Schema(String),

    /// A component was used before it was fitted.
    #[error("Not fitted: {0}")]
    NotFitted(String),

    /// A label or label index outside the fitted label space.
    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    /// Empty or malformed inference request.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// One or more persisted artifacts are absent.
    #[error("Artifact missing: {0}")]
    ArtifactMissing(String),

    /// CSV parsing errors.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary artifact encoding errors.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration values.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Dataset acquisition failures (missing tool, no CSV found).
    #[error("Acquisition error: {0}")]
    Acquisition(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with CareerLensError.
pub type Result<T> = std::result::Result<T, CareerLensError>;

impl CareerLensError {
    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        CareerLensError::Schema(msg.into())
    }

    /// Create a new not-fitted error.
    pub fn not_fitted<S: Into<String>>(msg: S) -> Self {
        CareerLensError::NotFitted(msg.into())
    }

    /// Create a new unknown label error.
    pub fn unknown_label<S: Into<String>>(msg: S) -> Self {
        CareerLensError::UnknownLabel(msg.into())
    }

    /// Create a new invalid input error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        CareerLensError::InvalidInput(msg.into())
    }

    /// Create a new artifact missing error.
    pub fn artifact_missing<S: Into<String>>(msg: S) -> Self {
        CareerLensError::ArtifactMissing(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        CareerLensError::Serialization(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        CareerLensError::Config(msg.into())
    }

    /// Create a new acquisition error.
    pub fn acquisition<S: Into<String>>(msg: S) -> Self {
        CareerLensError::Acquisition(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        CareerLensError::Other(msg.into())
    }

    /// Create an analysis error (tokenizer construction, regex patterns).
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        CareerLensError::Other(format!("Analysis: {}", msg.into()))
    }
}

impl From<bincode::Error> for CareerLensError {
    fn from(err: bincode::Error) -> Self {
        CareerLensError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = CareerLensError::schema("no label column");
        assert_eq!(error.to_string(), "Schema error: no label column");

        let error = CareerLensError::not_fitted("vectorizer");
        assert_eq!(error.to_string(), "Not fitted: vectorizer");

        let error = CareerLensError::invalid_input("empty batch");
        assert_eq!(error.to_string(), "Invalid input: empty batch");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = CareerLensError::from(io_error);

        match error {
            CareerLensError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
