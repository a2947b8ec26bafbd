//! Error types for the DSP engine.

use thiserror::Error;

/// Result type for DSP operations.
pub type DspResult<T> = Result<T, DspError>;

/// Errors that can occur during buffer processing.
#[derive(Debug, Error)]
pub enum DspError {
    /// Channel lengths disagree.
    #[error("channel {channel} has {got} samples, expected {expected}")]
    ChannelLengthMismatch {
        /// Offending channel index.
        channel: usize,
        /// Actual sample count.
        got: usize,
        /// Expected sample count.
        expected: usize,
    },

    /// Buffer has no channels.
    #[error("buffer must have at least one channel")]
    NoChannels,

    /// Invalid sample rate.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate.
        rate: u32,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Invalid time range for an edit operation.
    #[error("invalid range: {start_seconds}s..{end_seconds}s on a {buffer_seconds}s buffer")]
    InvalidRange {
        /// Range start in seconds.
        start_seconds: f32,
        /// Range end in seconds.
        end_seconds: f32,
        /// Buffer duration in seconds.
        buffer_seconds: f32,
    },

    /// Buffers cannot be combined.
    #[error("incompatible buffers: {message}")]
    IncompatibleBuffers {
        /// Error message.
        message: String,
    },

    /// I/O error while encoding output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DspError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }
}
