//! Error types for Reelcut.
//!
//! Every failure kind is terminal for the render that raised it; nothing
//! is retried internally. The caller either receives a complete payload
//! or one of these variants.

use thiserror::Error;

/// Main error type for Reelcut operations.
#[derive(Error, Debug)]
pub enum ReelcutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A clip's byte source could not be opened or decoded. Aborts the
    /// whole render; no partial output is ever returned.
    #[error("Clip load error: {0}")]
    ClipLoad(String),

    /// The requested background track could not be decoded. Aborts
    /// instead of silently rendering without audio.
    #[error("Audio decode error: {0}")]
    AudioDecode(String),

    /// Neither a hardware nor a software H.264 encoder is available.
    #[error("No usable codec: {0}")]
    CodecUnavailable(String),

    /// The encoder sink failed mid-stream; buffered output is discarded.
    #[error("Encoder error: {0}")]
    Encoder(String),

    /// Voluntary termination requested by the caller. Not a failure,
    /// but still produces no output.
    #[error("Render cancelled")]
    Cancelled,

    #[error("Probe error: {0}")]
    Probe(String),

    #[error("Timeline error: {0}")]
    Timeline(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ReelcutError {
    /// True for the voluntary-cancellation variant only.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type alias for Reelcut operations.
pub type Result<T> = std::result::Result<T, ReelcutError>;
