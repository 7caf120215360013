//! Curated insight list and its mutation operations
//!
//! Insights are short natural-language rules distilled from past successes
//! and failures. The list is ordered (operations address insights by
//! 1-based position), capacity-bounded, and mutated only through the four
//! [`Operation`]s. Lookups by text are fuzzy because the text comes back
//! from a language model that paraphrases and truncates.

use crate::error::MemoryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One curated insight with its strength score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightEntry {
    /// The insight text
    pub text: String,

    /// Heuristic strength counter; starts at 2, incremented by agreement
    pub score: i32,
}

impl InsightEntry {
    /// Create an entry with the initial score.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            score: 2,
        }
    }
}

/// A mutation of the insight list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Append a new insight (score 2) if capacity allows
    Add(String),

    /// Strengthen an existing insight found by fuzzy text match
    Agree(String),

    /// Replace the text of the insight at a 1-based position, keeping its score
    Edit { position: usize, text: String },

    /// Delete an existing insight found by fuzzy text match
    Remove(String),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Add(text) => write!(f, "ADD: {text}"),
            Operation::Agree(text) => write!(f, "AGREE: {text}"),
            Operation::Edit { position, text } => write!(f, "EDIT {position}: {text}"),
            Operation::Remove(text) => write!(f, "REMOVE: {text}"),
        }
    }
}

/// Why an operation was skipped rather than applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The list is at capacity, so the add was dropped
    AtCapacity,

    /// No stored insight matched the operation's text
    NoMatch,
}

/// Result of applying one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpOutcome {
    /// The operation changed the list
    Applied,

    /// The operation was a no-op
    Skipped(SkipReason),
}

/// Tally of an [`InsightStore::apply_all`] batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyStats {
    /// Operations that changed the list
    pub applied: usize,

    /// No-op operations (capacity or lookup miss)
    pub skipped: usize,

    /// Operations that returned an error
    pub failed: usize,
}

impl ApplyStats {
    /// Merge another tally into this one.
    pub fn merge(&mut self, other: ApplyStats) {
        self.applied += other.applied;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Default capacity of the insight list.
pub const DEFAULT_MAX_INSIGHTS: usize = 20;

/// Ordered, capacity-bounded list of insights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightStore {
    insights: Vec<InsightEntry>,
    max_insights: usize,
}

impl Default for InsightStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_INSIGHTS)
    }
}

impl InsightStore {
    /// Create an empty store with the given capacity.
    pub fn new(max_insights: usize) -> Self {
        Self {
            insights: Vec::new(),
            max_insights,
        }
    }

    /// Seed the store with existing entries (e.g. restored from a snapshot).
    ///
    /// Entries beyond the capacity are kept; the capacity only gates new adds.
    #[must_use]
    pub fn with_entries(mut self, entries: Vec<InsightEntry>) -> Self {
        self.insights = entries;
        self
    }

    /// Number of stored insights.
    pub fn len(&self) -> usize {
        self.insights.len()
    }

    /// Check if no insights are stored.
    pub fn is_empty(&self) -> bool {
        self.insights.is_empty()
    }

    /// Check if the list cannot accept more adds.
    pub fn at_capacity(&self) -> bool {
        self.insights.len() >= self.max_insights
    }

    /// The configured capacity.
    pub fn max_insights(&self) -> usize {
        self.max_insights
    }

    /// All entries in positional order.
    pub fn entries(&self) -> &[InsightEntry] {
        &self.insights
    }

    /// Remove all insights.
    pub fn clear(&mut self) {
        self.insights.clear();
    }

    /// Render the insights as a 1-based numbered list for prompts.
    ///
    /// The numbering matches the positions `Edit` operations address.
    pub fn numbered_list(&self) -> String {
        self.insights
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("{}. {}", i + 1, entry.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Apply one operation.
    ///
    /// - `Add`: appends with score 2; skipped when at capacity.
    /// - `Agree`: fuzzy-finds the insight and increments its score; a miss
    ///   is skipped, not an error.
    /// - `Edit`: replaces the text at the 1-based position, keeping the
    ///   score.
    /// - `Remove`: fuzzy-finds and deletes; a miss is skipped. Later
    ///   insights shift down one position.
    ///
    /// # Errors
    ///
    /// [`MemoryError::InsightIndexOutOfRange`] when an `Edit` position is
    /// zero or beyond the current list.
    pub fn apply(&mut self, operation: &Operation) -> Result<OpOutcome, MemoryError> {
        match operation {
            Operation::Add(text) => {
                if self.at_capacity() {
                    log::debug!("insight list at capacity ({}), dropping add", self.max_insights);
                    return Ok(OpOutcome::Skipped(SkipReason::AtCapacity));
                }
                self.insights.push(InsightEntry::new(text.clone()));
                Ok(OpOutcome::Applied)
            }
            Operation::Agree(text) => match self.position_of(text) {
                Some(pos) => {
                    self.insights[pos].score += 1;
                    Ok(OpOutcome::Applied)
                }
                None => {
                    log::debug!("no insight matches agreement text, skipping");
                    Ok(OpOutcome::Skipped(SkipReason::NoMatch))
                }
            },
            Operation::Edit { position, text } => {
                let index = position
                    .checked_sub(1)
                    .filter(|&i| i < self.insights.len())
                    .ok_or(MemoryError::InsightIndexOutOfRange {
                        position: *position,
                        len: self.insights.len(),
                    })?;
                self.insights[index].text = text.clone();
                Ok(OpOutcome::Applied)
            }
            Operation::Remove(text) => match self.position_of(text) {
                Some(pos) => {
                    self.insights.remove(pos);
                    Ok(OpOutcome::Applied)
                }
                None => {
                    log::debug!("no insight matches removal text, skipping");
                    Ok(OpOutcome::Skipped(SkipReason::NoMatch))
                }
            },
        }
    }

    /// Apply a batch of operations, continuing past individual failures.
    ///
    /// Errors (out-of-range edits) are counted in the tally rather than
    /// aborting the batch, since one malformed model operation should not
    /// discard the rest.
    pub fn apply_all(&mut self, operations: &[Operation]) -> ApplyStats {
        let mut stats = ApplyStats::default();

        for operation in operations {
            match self.apply(operation) {
                Ok(OpOutcome::Applied) => stats.applied += 1,
                Ok(OpOutcome::Skipped(_)) => stats.skipped += 1,
                Err(err) => {
                    log::warn!("insight operation failed: {err}");
                    stats.failed += 1;
                }
            }
        }

        stats
    }

    /// Position of the first insight whose text fuzzily matches `text`.
    ///
    /// Texts are compared whitespace-normalized; a match is equality or
    /// substring containment in either direction. Containment tolerates the
    /// model echoing an insight with a prefix or truncating it.
    pub fn position_of(&self, text: &str) -> Option<usize> {
        let needle = normalize(text);
        if needle.is_empty() {
            return None;
        }

        self.insights.iter().position(|entry| {
            let stored = normalize(&entry.text);
            stored == needle || stored.contains(&needle) || needle.contains(&stored)
        })
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
