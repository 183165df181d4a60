// src/core/errors.rs
use thiserror::Error;

/// Errors raised by input components.
#[derive(Error, Debug)]
pub enum ComponentError {
    /// A configuration literal (return type, datatype, preset value) is not one of
    /// its documented values, or a parameter combination cannot be used.
    #[error("Invalid Configuration: {0}")]
    InvalidConfiguration(String),

    /// The operation has no definition for this component kind.
    #[error("Not Supported: {0}")]
    NotSupported(String),

    /// A submitted value is not one of the declared choices.
    #[error("Unknown Choice: {0}")]
    UnknownChoice(String),

    /// A wire payload or native value does not have the expected shape.
    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    #[error("Decode Error: {0}")]
    Decode(String),

    #[error("Image Error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Audio Error: {0}")]
    Audio(#[from] hound::Error),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Ndarray Error: {0}")]
    NdarrayError(String),
}

impl From<ndarray::ShapeError> for ComponentError {
    fn from(err: ndarray::ShapeError) -> Self {
        ComponentError::NdarrayError(format!("ndarray ShapeError: {}", err))
    }
}

impl From<base64::DecodeError> for ComponentError {
    fn from(err: base64::DecodeError) -> Self {
        ComponentError::Decode(format!("invalid base64 payload: {}", err))
    }
}

// Convenience type alias for Result
pub type Result<T> = std::result::Result<T, ComponentError>;
