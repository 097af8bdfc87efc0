//! Error types for the lifeboat service

use thiserror::Error;

/// Result type alias for lifeboat operations
pub type Result<T> = std::result::Result<T, LifeboatError>;

/// Main error type for the lifeboat service
#[derive(Error, Debug)]
pub enum LifeboatError {
    #[error("empty corpus: no rows to fit on")]
    EmptyCorpus,

    #[error("no labeled rows remain after cleaning")]
    InsufficientLabels,

    #[error("passenger {0} not found")]
    NotFound(String),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("data error: {0}")]
    Data(String),

    #[error("model not fitted")]
    ModelNotFitted,

    #[error("invalid shape: expected {expected}, got {actual}")]
    Shape { expected: String, actual: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<polars::error::PolarsError> for LifeboatError {
    fn from(err: polars::error::PolarsError) -> Self {
        LifeboatError::Data(err.to_string())
    }
}

impl From<serde_json::Error> for LifeboatError {
    fn from(err: serde_json::Error) -> Self {
        LifeboatError::Serialization(err.to_string())
    }
}

impl From<ndarray::ShapeError> for LifeboatError {
    fn from(err: ndarray::ShapeError) -> Self {
        LifeboatError::Shape {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
