//! Custom error types for neural-style.

use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage at which an [`Error`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading or decoding an input image.
    Decode,
    /// Locating or loading the pretrained model.
    ModelLoad,
    /// Running the model or interpreting its outputs.
    Invocation,
    /// Writing the stylized image.
    Output,
    /// Rejected configuration.
    Config,
}

/// Main error type for the neural-style library.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or decode an image file.
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Image file extension is not one of the supported formats.
    #[error("unsupported image format for {path}: expected one of {supported}")]
    UnsupportedFormat { path: PathBuf, supported: String },

    /// Failed to save an image file.
    #[error("failed to save image to {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The model path does not exist.
    #[error("model not found at {path}")]
    ModelNotFound { path: PathBuf },

    /// Failed to load an ONNX model.
    #[error("failed to load model from {path}: {source}")]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: ort::Error,
    },

    /// The model loaded but does not follow the two-input calling convention.
    #[error("incompatible model at {path}: {reason}")]
    IncompatibleModel { path: PathBuf, reason: String },

    /// Model inference failed.
    #[error("model inference failed: {source}")]
    Inference {
        #[source]
        source: ort::Error,
    },

    /// The model produced no outputs.
    #[error("model returned no outputs")]
    EmptyOutput,

    /// Shape mismatch in tensor operations.
    #[error("tensor shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The pipeline stage this error belongs to.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Decode { .. } | Self::UnsupportedFormat { .. } => Stage::Decode,
            Self::ModelNotFound { .. } | Self::ModelLoad { .. } | Self::IncompatibleModel { .. } => {
                Stage::ModelLoad
            }
            Self::Inference { .. } | Self::EmptyOutput | Self::ShapeMismatch { .. } => {
                Stage::Invocation
            }
            Self::ImageSave { .. } | Self::Io(_) => Stage::Output,
            Self::InvalidParameter { .. } => Stage::Config,
        }
    }
}

/// Result type alias for neural-style operations.
pub type Result<T> = std::result::Result<T, Error>;
