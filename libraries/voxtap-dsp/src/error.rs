//! Tap-pipeline errors

use thiserror::Error;

/// Result type alias using `TapError`
pub type Result<T> = std::result::Result<T, TapError>;

/// Errors surfaced by the tap pipeline and its components
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TapError {
    /// The requested transform window size is unusable
    #[error("Invalid window size: {0}")]
    InvalidWindowSize(usize),

    /// A transform or process call arrived before `prepare` (or after
    /// teardown)
    #[error("Pipeline is not prepared")]
    NotPrepared,

    /// `prepare` was called twice without an intervening teardown
    #[error("Pipeline is already prepared")]
    AlreadyPrepared,

    /// The stream format was never captured; the buffer passes through
    /// unmodified and processing continues on the next buffer
    #[error("Stream format was never captured")]
    MissingFormat,

    /// A buffer length does not match what the prepared window requires
    #[error("Invalid buffer size: {0}")]
    InvalidBufferSize(String),
}

impl From<TapError> for voxtap_core::VoxtapError {
    fn from(err: TapError) -> Self {
        voxtap_core::VoxtapError::dsp(err.to_string())
    }
}
