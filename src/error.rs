//! Error types for the transfer pipeline
//!
//! Every error except a zero accuracy denominator is fatal: it aborts the
//! current epoch and the run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for backdoor-transfer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building, training or evaluating
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration value or path
    #[error("Configuration error: {0}")]
    Config(String),

    /// A poison index points outside the clean training set
    #[error("Poison index {index} out of range for dataset of {len} samples")]
    IndexOutOfRange { index: usize, len: usize },

    /// The caller required a non-empty poison set but got none
    #[error("Poison index set is empty but a non-empty set was required")]
    EmptyIndexSet,

    /// Unrecognised trigger mode value
    #[error("Invalid trigger mode: {0} (must be 0=train, 1=eval_clean, 2=eval_backdoor)")]
    InvalidMode(i64),

    /// A sample or batch does not have the expected shape or contents
    #[error("Invalid sample: {0}")]
    InvalidSample(String),

    /// Metrics recorded out of order
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// Failure reading a `.npy` array
    #[error("Failed to read array {path}: {message}")]
    Npy { path: PathBuf, message: String },

    /// Failure writing the metrics table
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error is raised before training starts
    pub fn is_startup_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::IndexOutOfRange { .. } | Self::EmptyIndexSet | Self::Npy { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_out_of_range_message() {
        let err = Error::IndexOutOfRange { index: 120, len: 100 };
        let msg = err.to_string();
        assert!(msg.contains("120"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn test_invalid_mode_message() {
        let err = Error::InvalidMode(7);
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_startup_classification() {
        assert!(Error::EmptyIndexSet.is_startup_error());
        assert!(Error::Config("x".into()).is_startup_error());
        assert!(!Error::InvalidSample("bad".into()).is_startup_error());
        assert!(!Error::InvalidMode(3).is_startup_error());
    }
}
