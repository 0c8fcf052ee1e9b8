//! Error types for mimic operations

use thiserror::Error;

/// Main error type for mimic operations
#[derive(Error, Debug)]
pub enum MimicError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),

    #[error("Variable has no data: {0}")]
    MissingData(String),

    #[error("No file path configured for write mode '{0}'")]
    MissingPath(String),

    #[error("Invalid file mode: {0}")]
    InvalidMode(String),

    #[error("Invalid selection: {0}")]
    Selection(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Specialized Result type for mimic operations
pub type Result<T> = std::result::Result<T, MimicError>;

impl From<bincode::Error> for MimicError {
    fn from(err: bincode::Error) -> Self {
        MimicError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for MimicError {
    fn from(err: serde_json::Error) -> Self {
        MimicError::Serialization(err.to_string())
    }
}

impl From<ndarray::ShapeError> for MimicError {
    fn from(err: ndarray::ShapeError) -> Self {
        MimicError::ShapeMismatch(err.to_string())
    }
}
