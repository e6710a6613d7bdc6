//! Error types for docstrum.

use thiserror::Error;

/// Result type alias for docstrum operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during structure analysis.
#[derive(Error, Debug)]
pub enum Error {
    /// Bounds with NaN/infinite components or negative extent.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Segmentation or reading-order resolution cannot proceed.
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// A classifier was asked to classify against a model with no exemplars.
    #[error("Classification model holds no exemplars")]
    EmptyModel,

    /// Feature vector dimensionality does not match the model.
    #[error("Invalid feature vector: expected {expected} dimensions, got {actual}")]
    InvalidFeatureVector {
        /// Dimension of the model's exemplars
        expected: usize,
        /// Dimension of the offending vector
        actual: usize,
    },

    /// Error during rendering (JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap a lower-level failure as an analysis error, keeping its message.
    pub fn analysis(context: impl std::fmt::Display, cause: &Error) -> Self {
        Error::Analysis(format!("{}: {}", context, cause))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::EmptyModel;
        assert_eq!(err.to_string(), "Classification model holds no exemplars");

        let err = Error::InvalidFeatureVector {
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Invalid feature vector: expected 4 dimensions, got 3"
        );
    }

    #[test]
    fn test_analysis_wraps_cause() {
        let cause = Error::InvalidGeometry("x is NaN".to_string());
        let err = Error::analysis("chunk 3", &cause);
        assert!(matches!(err, Error::Analysis(_)));
        assert_eq!(
            err.to_string(),
            "Analysis error: chunk 3: Invalid geometry: x is NaN"
        );
    }
}
