//! Language model boundary and a scripted stand-in
//!
//! The extraction pipeline only needs one capability from a model: turn a
//! prompt into a text completion. [`LanguageModel`] captures that;
//! [`ScriptedModel`] replays canned completions in order, enabling:
//!
//! - **Offline testing**: run extraction without API calls
//! - **Deterministic testing**: replay exact critique sequences
//! - **Cost-free evaluation**: re-run extraction over historical output
//!
//! # Example
//!
//! ```
//! use hindsight_distill::{LanguageModel, ScriptedModel};
//!
//! # async fn example() -> Result<(), hindsight_distill::LmError> {
//! let model = ScriptedModel::from_responses(vec![
//!     "ADD: Search before guessing.".to_string(),
//! ]);
//!
//! let critique = model.complete("What went wrong here?").await?;
//! assert!(critique.starts_with("ADD:"));
//! assert!(model.is_exhausted());
//! # Ok(())
//! # }
//! ```

use crate::error::LmError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A text-completion backend
///
/// Implementations wrap whatever transport reaches the actual model; the
/// pipeline never sees more than prompt-in, text-out.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete a prompt with a single text response.
    ///
    /// # Errors
    ///
    /// [`LmError`] when the backend cannot produce a completion.
    async fn complete(&self, prompt: &str) -> Result<String, LmError>;
}

/// Language model that replays canned responses in order
///
/// Each call to `complete()` returns the next response regardless of the
/// prompt. The cursor is atomic, so a shared reference can be handed to
/// concurrent callers without locking.
#[derive(Debug)]
pub struct ScriptedModel {
    responses: Vec<String>,
    cursor: AtomicUsize,
}

impl ScriptedModel {
    /// Create a model that will serve these responses in order.
    pub fn from_responses(responses: Vec<String>) -> Self {
        Self {
            responses,
            cursor: AtomicUsize::new(0),
        }
    }

    /// How many completions have been served so far.
    pub fn calls(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    /// Total number of scripted responses.
    pub fn response_count(&self) -> usize {
        self.responses.len()
    }

    /// Check if all responses have been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.calls() >= self.responses.len()
    }

    /// Rewind to the first response.
    pub fn reset(&self) {
        self.cursor.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    /// Serve the next scripted response.
    ///
    /// # Errors
    ///
    /// - [`LmError::InvalidRequest`] if the prompt is empty
    /// - [`LmError::Exhausted`] once every response has been served
    async fn complete(&self, prompt: &str) -> Result<String, LmError> {
        if prompt.is_empty() {
            return Err(LmError::InvalidRequest("prompt cannot be empty".into()));
        }

        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.responses.get(index).cloned().ok_or(LmError::Exhausted {
            served: self.responses.len(),
        })
    }
}
