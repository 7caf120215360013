//! Append-only storage for trajectory records
//!
//! The store is an arena: records are appended in batches, assigned dense
//! ids in insertion order, and never mutated afterwards. The only way to
//! remove anything is [`TrajectoryStore::clear`], which also restarts id
//! assignment at zero.

use crate::error::MemoryError;
use crate::trajectory::{TrajectoryId, TrajectoryRecord, Trial};
use serde::{Deserialize, Serialize};

/// A column-oriented batch of records to append
///
/// All columns must have equal length. `reflections` may be left empty to
/// mean "no reflections for any record in this batch"; otherwise it must
/// match the other columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordBatch {
    /// Task questions
    pub questions: Vec<String>,

    /// Known-correct answers, one per question
    pub reference_answers: Vec<String>,

    /// All trials per question, in attempt order
    pub trials: Vec<Vec<Trial>>,

    /// Reflection notes per question (empty = none for the whole batch)
    #[serde(default)]
    pub reflections: Vec<Vec<String>>,
}

impl RecordBatch {
    /// Create a batch without reflections.
    pub fn new(
        questions: Vec<String>,
        reference_answers: Vec<String>,
        trials: Vec<Vec<Trial>>,
    ) -> Self {
        Self {
            questions,
            reference_answers,
            trials,
            reflections: Vec::new(),
        }
    }

    /// Attach per-record reflections.
    #[must_use]
    pub fn with_reflections(mut self, reflections: Vec<Vec<String>>) -> Self {
        self.reflections = reflections;
        self
    }

    /// Number of records in this batch.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Check if the batch has no records.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    fn validate(&self) -> Result<(), MemoryError> {
        let n = self.questions.len();
        let shapes_match = self.reference_answers.len() == n
            && self.trials.len() == n
            && (self.reflections.is_empty() || self.reflections.len() == n);

        if !shapes_match {
            return Err(MemoryError::ShapeMismatch {
                questions: n,
                answers: self.reference_answers.len(),
                trials: self.trials.len(),
                reflections: self.reflections.len(),
            });
        }

        if let Some(position) = self.trials.iter().position(Vec::is_empty) {
            return Err(MemoryError::EmptyTrials { position });
        }

        Ok(())
    }
}

/// Append-only arena of trajectory records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrajectoryStore {
    records: Vec<TrajectoryRecord>,
}

impl TrajectoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch of records, assigning each a fresh id.
    ///
    /// Returns the assigned ids in batch order. Ids continue densely from
    /// the current count, so after a `clear` they restart at zero.
    ///
    /// # Errors
    ///
    /// - [`MemoryError::ShapeMismatch`] if the batch columns disagree in length
    /// - [`MemoryError::EmptyTrials`] if any record has an empty trial list
    pub fn append(&mut self, batch: RecordBatch) -> Result<Vec<TrajectoryId>, MemoryError> {
        batch.validate()?;

        let RecordBatch {
            questions,
            reference_answers,
            trials,
            reflections,
        } = batch;

        let reflections = if reflections.is_empty() {
            vec![Vec::new(); questions.len()]
        } else {
            reflections
        };

        let start = self.records.len();
        let mut ids = Vec::with_capacity(questions.len());

        let columns = questions
            .into_iter()
            .zip(reference_answers)
            .zip(trials)
            .zip(reflections);

        for (offset, (((question, reference_answer), trials), reflections)) in columns.enumerate() {
            let id = TrajectoryId::new(start + offset);
            self.records.push(TrajectoryRecord {
                id,
                question,
                reference_answer,
                trials,
                reflections,
            });
            ids.push(id);
        }

        Ok(ids)
    }

    /// Look up a record by id.
    pub fn get(&self, id: TrajectoryId) -> Option<&TrajectoryRecord> {
        self.records.get(id.index())
    }

    /// Number of stored records.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records in id order.
    pub fn iter(&self) -> impl Iterator<Item = &TrajectoryRecord> {
        self.records.iter()
    }

    /// All records as a slice, in id order.
    pub fn records(&self) -> &[TrajectoryRecord] {
        &self.records
    }

    /// Ids of all stored records.
    pub fn ids(&self) -> Vec<TrajectoryId> {
        self.records.iter().map(|r| r.id).collect()
    }

    /// Remove every record and restart id assignment at zero.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
