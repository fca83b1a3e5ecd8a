//! Error types for the codec.

/// Errors that can occur while encoding or decoding values.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The value (or part of it) has no wire representation.
    #[error("unsupported input type: {0}")]
    UnsupportedInputType(String),

    /// The decoder met a tag byte it has no payload shape for.
    #[error("unsupported tag: {0}")]
    UnsupportedTag(u8),

    /// The input is truncated, corrupt, or exceeds a configured limit.
    #[error("malformed stream: {0}")]
    MalformedStream(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Wraps any displayable error as a malformed-stream error.
    pub fn malformed(e: impl std::fmt::Display) -> Self {
        Self::MalformedStream(e.to_string())
    }

    /// Returns `true` for errors caused by the bytes being decoded.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::UnsupportedTag(_) | Self::MalformedStream(_))
    }
}
