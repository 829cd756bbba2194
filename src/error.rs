//! Error types for the cardio_insight analytics core

use thiserror::Error;

/// Result type alias for cardio_insight operations
pub type Result<T> = std::result::Result<T, InsightError>;

/// Main error type for the analytics core
#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Invalid column: {0}")]
    InvalidColumn(String),

    #[error("Insufficient data: {reason} ({n_samples} usable samples)")]
    InsufficientData { n_samples: usize, reason: String },

    #[error("Degenerate fit: all {n_samples} target values are identical, R² is undefined")]
    DegenerateFit { n_samples: usize },

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Dimension mismatch: {features} feature rows, {targets} targets")]
    DimensionMismatch { features: usize, targets: usize },

    #[error("Data error: {0}")]
    DataError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model not fitted")]
    ModelNotFitted,
}

impl InsightError {
    /// Failures a single correlation-matrix cell may absorb as "N/A".
    pub fn is_pair_recoverable(&self) -> bool {
        matches!(
            self,
            InsightError::InsufficientData { .. } | InsightError::DegenerateFit { .. }
        )
    }
}

impl From<polars::error::PolarsError> for InsightError {
    fn from(err: polars::error::PolarsError) -> Self {
        InsightError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for InsightError {
    fn from(err: serde_json::Error) -> Self {
        InsightError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for InsightError {
    fn from(err: ndarray::ShapeError) -> Self {
        InsightError::ShapeError {
            expected: "rectangular feature matrix".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InsightError::InvalidColumn("pulse".to_string());
        assert_eq!(err.to_string(), "Invalid column: pulse");

        let err = InsightError::DimensionMismatch { features: 4, targets: 3 };
        assert_eq!(err.to_string(), "Dimension mismatch: 4 feature rows, 3 targets");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: InsightError = io_err.into();
        assert!(matches!(err, InsightError::IoError(_)));
    }

    #[test]
    fn test_pair_recoverable() {
        assert!(InsightError::DegenerateFit { n_samples: 3 }.is_pair_recoverable());
        assert!(InsightError::InsufficientData {
            n_samples: 1,
            reason: "need at least 2 samples".to_string(),
        }
        .is_pair_recoverable());
        assert!(!InsightError::InvalidColumn("x".to_string()).is_pair_recoverable());
        assert!(!InsightError::EmptyDataset("features".to_string()).is_pair_recoverable());
    }
}
