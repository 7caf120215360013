//! Retrieval documents projected from successful trajectories
//!
//! Every successful canonical trial is fanned out into one document per
//! facet: the task question, each action, each thought, and each full step.
//! Documents carry the owning trajectory's id so retrieval can be
//! de-duplicated per task and resolved back to the full record.

use crate::trajectory::{TrajectoryId, Trial};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The facet of a trajectory a document was projected from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// The task question itself
    Task,
    /// One action taken during the trial
    Action,
    /// One reasoning step during the trial
    Thought,
    /// One full think-act-observe step
    Step,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentKind::Task => "task",
            DocumentKind::Action => "action",
            DocumentKind::Thought => "thought",
            DocumentKind::Step => "step",
        };
        write!(f, "{name}")
    }
}

/// An immutable retrieval document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// The text that gets embedded and searched
    pub text: String,

    /// Which facet this document represents
    pub kind: DocumentKind,

    /// Id of the trajectory this document was projected from
    pub task_idx: TrajectoryId,
}

impl Document {
    /// Create a document.
    pub fn new(text: impl Into<String>, kind: DocumentKind, task_idx: TrajectoryId) -> Self {
        Self {
            text: text.into(),
            kind,
            task_idx,
        }
    }
}

/// Project a successful trial into its retrieval documents.
///
/// Emits, in order: one `Task` document (the question), one `Action`
/// document per step, one `Thought` document per step, then one `Step`
/// document per step. An N-step trial therefore yields `1 + 3 * N`
/// documents, all tagged with `task_idx`.
pub fn documents_for_trial(task_idx: TrajectoryId, question: &str, trial: &Trial) -> Vec<Document> {
    let mut docs = Vec::with_capacity(1 + 3 * trial.steps.len());

    docs.push(Document::new(question, DocumentKind::Task, task_idx));

    docs.extend(
        trial
            .steps
            .iter()
            .map(|step| Document::new(step.action.clone(), DocumentKind::Action, task_idx)),
    );

    docs.extend(
        trial
            .steps
            .iter()
            .map(|step| Document::new(step.thought.clone(), DocumentKind::Thought, task_idx)),
    );

    docs.extend(
        trial
            .steps
            .iter()
            .map(|step| Document::new(step.text(), DocumentKind::Step, task_idx)),
    );

    docs
}
