//! # Playback Error Types

use thiserror::Error;

/// Errors that can occur while fetching or decoding a track.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Source Errors
    // ========================================================================
    /// Fetching the track's bytes failed (network error, aborted transfer).
    #[error("Audio source unavailable: {0}")]
    SourceUnavailable(String),

    // ========================================================================
    // Format/Codec Errors
    // ========================================================================
    /// Audio payload is not recognized or cannot be parsed.
    #[error("Unsupported or invalid audio format: {0}")]
    InvalidFormat(String),

    /// Audio format was detected but no audio track can be decoded.
    #[error("Cannot decode audio format: {0}")]
    FormatNotDecodable(String),

    /// Error occurred during audio decoding.
    #[error("Decoding error: {0}")]
    DecodingError(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Internal error (should not occur in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlaybackError {
    /// Returns `true` for transient failures where playback simply fails to
    /// start and a later attempt may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, PlaybackError::SourceUnavailable(_))
    }

    /// Returns `true` for format/codec failures that will not improve on
    /// retry.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            PlaybackError::InvalidFormat(_)
                | PlaybackError::FormatNotDecodable(_)
                | PlaybackError::DecodingError(_)
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
