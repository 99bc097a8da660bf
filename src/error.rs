// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the pose decoding library.

use std::fmt;

/// Result type alias for decode operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Main error type for the pose decoding library.
#[derive(Debug)]
pub enum DecodeError {
    /// Invalid configuration provided (unknown mode, out-of-range thresholds).
    ConfigError(String),
    /// A tensor does not have the shape the decoder expects.
    ShapeMismatchError(String),
    /// Input dimensions make decoding impossible (e.g. a one-cell heatmap).
    DegenerateInputError(String),
    /// Malformed tensor bundle on disk.
    TensorFileError(String),
    /// Wrapped `std::io::Error`
    Io(std::io::Error),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Config error: {msg}"),
            Self::ShapeMismatchError(msg) => write!(f, "Shape mismatch: {msg}"),
            Self::DegenerateInputError(msg) => write!(f, "Degenerate input: {msg}"),
            Self::TensorFileError(msg) => write!(f, "Tensor file error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DecodeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::TensorFileError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for DecodeError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::ShapeMismatchError(err.to_string())
    }
}
