//! Error types for the composition engine.

use thiserror::Error;

/// Result type for composition operations.
pub type ComposeResult<T> = Result<T, ComposeError>;

/// Errors that can occur while generating a composition.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A generator setting is outside its documented range.
    #[error("invalid setting '{name}': {message}")]
    InvalidSetting {
        /// Setting name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Error propagated from the DSP engine.
    #[error(transparent)]
    Dsp(#[from] lofigen_dsp::DspError),
}

impl ComposeError {
    /// Creates an invalid setting error.
    pub fn invalid_setting(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSetting {
            name: name.into(),
            message: message.into(),
        }
    }
}
