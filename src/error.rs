//! Error types for the region classification library.
//!
//! This module defines all error types that can occur while reading datasets,
//! training and evaluating models, and loading persisted classifiers.
//! Feature extraction itself never fails: degenerate geometry resolves to
//! sentinel feature values instead of errors.

/// Result type alias for region classification operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur above the feature layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A dataset row or feature vector has the wrong number of fields
    #[error("Malformed row at line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        /// 1-based line number (0 when the row did not come from a file)
        line: usize,
        /// Expected number of fields
        expected: usize,
        /// Actual number of fields
        found: usize,
    },

    /// A dataset field could not be parsed as a number
    #[error("Invalid number at line {line}, column {column}: '{value}'")]
    InvalidNumber {
        /// 1-based line number
        line: usize,
        /// 1-based column number
        column: usize,
        /// Offending text
        value: String,
    },

    /// A category code outside the closed label space
    #[error("Unknown category code: {0}")]
    UnknownCategory(String),

    /// Inputs and labels of different lengths
    #[error("Length mismatch: {inputs} inputs but {labels} labels")]
    LengthMismatch {
        /// Number of feature vectors
        inputs: usize,
        /// Number of labels
        labels: usize,
    },

    /// No rows to work with
    #[error("Dataset is empty")]
    EmptyDataset,

    /// Fewer distinct labels than a classifier needs
    #[error("Insufficient data: found {distinct} distinct label(s), need at least 2")]
    InsufficientData {
        /// Number of distinct labels found
        distinct: usize,
    },

    /// Model fitting failed or the cross-validation split is degenerate
    #[error("Training error: {0}")]
    Training(String),

    /// Persisted model file does not exist
    #[error("Model file not found: {0}")]
    ModelNotFound(std::path::PathBuf),

    /// Persisted model could not be decoded
    #[error("Corrupt model: {0}")]
    CorruptModel(String),

    /// Model classes do not match the known categories
    #[error("Label space mismatch: {0}")]
    LabelSpaceMismatch(String),

    /// Illegal sampling request
    #[error("Invalid sample: cannot draw {count} indices from {start}..{end}")]
    InvalidSampleRange {
        /// Requested number of indices
        count: usize,
        /// Inclusive lower bound
        start: usize,
        /// Exclusive upper bound
        end: usize,
    },

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_row_error() {
        let err = Error::MalformedRow {
            line: 12,
            expected: 14,
            found: 9,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("line 12"));
        assert!(msg.contains("expected 14"));
        assert!(msg.contains("found 9"));
    }

    #[test]
    fn test_insufficient_data_error() {
        let err = Error::InsufficientData { distinct: 1 };
        assert!(err.to_string().contains("1 distinct label"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
