//! Core error types for VoxTap

use thiserror::Error;

/// Result type alias using `VoxtapError`
pub type Result<T> = std::result::Result<T, VoxtapError>;

/// Core error type for VoxTap
#[derive(Error, Debug)]
pub enum VoxtapError {
    /// Signal-processing errors (transform, mask, pipeline state)
    #[error("DSP error: {0}")]
    Dsp(String),

    /// Playback host errors (rate control, capability queries)
    #[error("Playback error: {0}")]
    Playback(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl VoxtapError {
    /// Create a DSP error from any displayable message
    pub fn dsp(msg: impl Into<String>) -> Self {
        Self::Dsp(msg.into())
    }

    /// Create a playback error from any displayable message
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Create an invalid-input error from any displayable message
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
