use hindsight_core::MemoryError;
use thiserror::Error;

/// Top-level error type for the distillation pipeline
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DistillError {
    /// Error from the experience memory layer
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    /// Error from the language model backend
    #[error("Language model error: {0}")]
    Lm(#[from] LmError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DistillError {
    /// Check if this error came from the language model backend.
    ///
    /// Model failures abort an extraction run partway; the insight store
    /// keeps whatever operations were applied before the failure.
    pub fn is_lm(&self) -> bool {
        matches!(self, DistillError::Lm(_))
    }
}

/// Errors from a language model backend
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LmError {
    /// A scripted backend ran out of canned responses
    #[error("No responses left after {served} completions")]
    Exhausted {
        /// How many completions were served before running dry
        served: usize,
    },

    /// The request was rejected before reaching the model
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Backend-specific failure
    #[error("Model error: {0}")]
    Model(String),
}

impl LmError {
    /// Check if the backend ran out of responses.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, LmError::Exhausted { .. })
    }
}
