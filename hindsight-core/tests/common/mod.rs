//! Shared test utilities for integration tests
//!
//! Builders for assembling trajectory pools without repeating the
//! column-oriented batch plumbing in every test file.

// Allow unused code - each test file includes this module separately,
// so not all helpers are used in every compilation unit.
#![allow(dead_code)]

use hindsight_core::{RecordBatch, Step, Trial};

/// Incrementally assemble a [`RecordBatch`] from whole records.
#[derive(Default)]
pub struct PoolBuilder {
    questions: Vec<String>,
    answers: Vec<String>,
    trials: Vec<Vec<Trial>>,
    reflections: Vec<Vec<String>>,
}

impl PoolBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A record whose first attempt succeeded. Each `(thought, action,
    /// observation)` tuple becomes one step.
    pub fn solved(mut self, question: &str, answer: &str, steps: &[(&str, &str, &str)]) -> Self {
        self.questions.push(question.to_string());
        self.answers.push(answer.to_string());
        self.trials.push(vec![Trial::new(true, answer, steps_of(steps))]);
        self.reflections.push(Vec::new());
        self
    }

    /// A record whose only attempt failed.
    pub fn failed(mut self, question: &str, answer: &str) -> Self {
        self.questions.push(question.to_string());
        self.answers.push(answer.to_string());
        self.trials.push(vec![Trial::new(
            false,
            "not sure",
            vec![Step::new("I am unsure", "Guess[not sure]", "incorrect")],
        )]);
        self.reflections.push(Vec::new());
        self
    }

    /// A record that failed first, reflected, and succeeded on the retry.
    pub fn retried(mut self, question: &str, answer: &str, reflection: &str) -> Self {
        self.questions.push(question.to_string());
        self.answers.push(answer.to_string());
        self.trials.push(vec![
            Trial::new(
                false,
                "not sure",
                vec![Step::new("I will guess", "Guess[not sure]", "incorrect")],
            ),
            Trial::new(
                true,
                answer,
                vec![Step::new(
                    "Last time guessing failed, I should search instead",
                    format!("Search[{question}]"),
                    answer,
                )],
            ),
        ]);
        self.reflections.push(vec![reflection.to_string()]);
        self
    }

    pub fn build(self) -> RecordBatch {
        RecordBatch::new(self.questions, self.answers, self.trials)
            .with_reflections(self.reflections)
    }
}

fn steps_of(steps: &[(&str, &str, &str)]) -> Vec<Step> {
    steps
        .iter()
        .map(|(thought, action, observation)| Step::new(*thought, *action, *observation))
        .collect()
}

/// A small question-answering pool: three first-trial successes, one
/// plain failure, and one failure recovered on retry.
pub fn qa_pool() -> RecordBatch {
    PoolBuilder::new()
        .solved(
            "What is the capital of France?",
            "Paris",
            &[
                (
                    "I should search for the capital of France",
                    "Search[capital of France]",
                    "Paris is the capital and largest city of France",
                ),
                ("The answer is Paris", "Finish[Paris]", "correct"),
            ],
        )
        .solved(
            "Which planet is closest to the sun?",
            "Mercury",
            &[(
                "I recall the planet closest to the sun",
                "Finish[Mercury]",
                "correct",
            )],
        )
        .solved(
            "Who wrote Pride and Prejudice?",
            "Jane Austen",
            &[
                (
                    "I should search for the author of Pride and Prejudice",
                    "Search[Pride and Prejudice author]",
                    "Pride and Prejudice is a novel by Jane Austen",
                ),
                ("The author is Jane Austen", "Finish[Jane Austen]", "correct"),
            ],
        )
        .failed("How deep is the Mariana Trench?", "about 11 kilometres")
        .retried(
            "What year did the Berlin Wall fall?",
            "1989",
            "Guessing dates does not work; search for the event instead",
        )
        .build()
}
