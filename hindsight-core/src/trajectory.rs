//! Trajectory records: the raw material of experiential learning
//!
//! A trajectory captures every attempt an agent made at one task. Each
//! attempt (a [`Trial`]) is a sequence of think-act-observe [`Step`]s plus
//! the final answer and a success judgement. Records are append-only and
//! referenced by a dense [`TrajectoryId`] assigned by the store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a stored trajectory record
///
/// Ids are assigned densely from zero in insertion order, so they double as
/// positions in the store. Clearing the store restarts assignment at zero.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct TrajectoryId(usize);

impl TrajectoryId {
    /// Create an id from a raw position.
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// The raw position of this id.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TrajectoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One think-act-observe step within a trial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// The agent's reasoning for this step
    pub thought: String,

    /// The action the agent took
    pub action: String,

    /// What the environment returned
    pub observation: String,
}

impl Step {
    /// Create a step from its three parts.
    pub fn new(
        thought: impl Into<String>,
        action: impl Into<String>,
        observation: impl Into<String>,
    ) -> Self {
        Self {
            thought: thought.into(),
            action: action.into(),
            observation: observation.into(),
        }
    }

    /// Render the step as scratchpad text.
    pub fn text(&self) -> String {
        format!(
            "Thought: {}\nAction: {}\nObservation: {}",
            self.thought, self.action, self.observation
        )
    }
}

/// One complete attempt at a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trial {
    /// Whether the final answer was judged correct
    pub success: bool,

    /// The answer the agent finished with
    pub final_answer: String,

    /// The steps taken during the attempt
    pub steps: Vec<Step>,
}

impl Trial {
    /// Create a trial.
    pub fn new(success: bool, final_answer: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            success,
            final_answer: final_answer.into(),
            steps,
        }
    }

    /// Render all steps as one scratchpad block, steps separated by newlines.
    pub fn steps_text(&self) -> String {
        self.steps
            .iter()
            .map(Step::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// All attempts an agent made at one task
///
/// The zero-th trial is the canonical one: fewshot exemplars and retrieval
/// documents are derived from it when it succeeded. Later trials exist when
/// the agent retried after failure; the last trial is the one compared
/// against earlier failures during insight extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    /// Store-assigned identifier
    pub id: TrajectoryId,

    /// The task the agent was asked to solve
    pub question: String,

    /// The known-correct answer used to judge trials
    pub reference_answer: String,

    /// Every attempt, in the order they were made (never empty once stored)
    pub trials: Vec<Trial>,

    /// Self-reflection notes produced between retries
    pub reflections: Vec<String>,
}

impl TrajectoryRecord {
    /// The canonical (zero-th) trial, if any.
    pub fn first_trial(&self) -> Option<&Trial> {
        self.trials.first()
    }

    /// The most recent trial, if any.
    pub fn last_trial(&self) -> Option<&Trial> {
        self.trials.last()
    }

    /// Whether the canonical trial succeeded.
    pub fn first_trial_succeeded(&self) -> bool {
        self.first_trial().is_some_and(|t| t.success)
    }

    /// Render this record as a fewshot exemplar: the question followed by
    /// the canonical trial's scratchpad.
    ///
    /// Returns `None` when the record has no trials.
    pub fn exemplar(&self) -> Option<String> {
        self.first_trial()
            .map(|trial| format!("{}\n{}", self.question, trial.steps_text()))
    }
}
