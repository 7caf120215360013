//! Shared test utilities for integration tests
//!
//! Record builders and a prompt-recording model wrapper used across the
//! extraction test files.

// Allow unused code - each test file includes this module separately,
// so not all helpers are used in every compilation unit.
#![allow(dead_code)]

use async_trait::async_trait;
use hindsight_core::{Step, TrajectoryId, TrajectoryRecord, Trial};
use hindsight_distill::{LanguageModel, LmError, ScriptedModel};
use std::sync::Mutex;

/// A record solved on the first attempt.
pub fn solved(id: usize, question: &str, answer: &str) -> TrajectoryRecord {
    TrajectoryRecord {
        id: TrajectoryId::new(id),
        question: question.to_string(),
        reference_answer: answer.to_string(),
        trials: vec![Trial::new(
            true,
            answer,
            vec![Step::new(
                format!("I should search for {question}"),
                format!("Search[{question}]"),
                answer,
            )],
        )],
        reflections: vec![],
    }
}

/// A record that failed `failures` times before succeeding.
pub fn recovered(id: usize, question: &str, answer: &str, failures: usize) -> TrajectoryRecord {
    let mut trials: Vec<Trial> = (0..failures)
        .map(|attempt| {
            Trial::new(
                false,
                "not sure",
                vec![Step::new(
                    format!("Attempt {attempt}: I will guess"),
                    "Guess[not sure]",
                    "incorrect",
                )],
            )
        })
        .collect();
    trials.push(Trial::new(
        true,
        answer,
        vec![Step::new(
            "Guessing failed before, searching instead",
            format!("Search[{question}]"),
            answer,
        )],
    ));

    TrajectoryRecord {
        id: TrajectoryId::new(id),
        question: question.to_string(),
        reference_answer: answer.to_string(),
        trials,
        reflections: vec!["Searching beats guessing for factual questions".to_string()],
    }
}

/// A record that never succeeded.
pub fn unsolved(id: usize, question: &str) -> TrajectoryRecord {
    TrajectoryRecord {
        id: TrajectoryId::new(id),
        question: question.to_string(),
        reference_answer: "unknown".to_string(),
        trials: vec![Trial::new(
            false,
            "not sure",
            vec![Step::new("I am stuck", "Guess[not sure]", "incorrect")],
        )],
        reflections: vec![],
    }
}

/// Scripted model that also records every prompt it was given.
pub struct RecordingModel {
    inner: ScriptedModel,
    prompts: Mutex<Vec<String>>,
}

impl RecordingModel {
    pub fn from_responses(responses: Vec<String>) -> Self {
        Self {
            inner: ScriptedModel::from_responses(responses),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt seen so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.inner.calls()
    }
}

#[async_trait]
impl LanguageModel for RecordingModel {
    async fn complete(&self, prompt: &str) -> Result<String, LmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.inner.complete(prompt).await
    }
}

/// N copies of the same response text.
pub fn repeated(text: &str, n: usize) -> Vec<String> {
    std::iter::repeat_with(|| text.to_string()).take(n).collect()
}
