use thiserror::Error;

/// Errors that can occur in the memory layer
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MemoryError {
    /// Batch columns have unequal lengths
    #[error(
        "Batch shape mismatch: {questions} questions, {answers} answers, {trials} trial lists, {reflections} reflection lists"
    )]
    ShapeMismatch {
        questions: usize,
        answers: usize,
        trials: usize,
        reflections: usize,
    },

    /// A record in the batch has no trials
    #[error("Record at batch position {position} has no trials")]
    EmptyTrials { position: usize },

    /// No retrieval index exists (no successful trajectory has been stored)
    #[error("No retrieval index: no successful trajectory available")]
    NoIndex,

    /// Unknown re-ranking strategy name
    #[error("Unsupported re-ranking strategy: {0:?}")]
    UnsupportedReranker(String),

    /// Insight position outside the current insight list
    #[error("Insight position {position} out of range (have {len} insights)")]
    InsightIndexOutOfRange { position: usize, len: usize },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MemoryError {
    /// Check if this error means "no exemplars are available yet".
    ///
    /// Callers that treat an unpopulated memory as an empty result rather
    /// than a failure can branch on this instead of matching variants.
    pub fn is_no_index(&self) -> bool {
        matches!(self, MemoryError::NoIndex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::shape_mismatch(
        MemoryError::ShapeMismatch { questions: 2, answers: 3, trials: 2, reflections: 0 },
        &["shape mismatch", "2 questions", "3 answers"]
    )]
    #[case::empty_trials(
        MemoryError::EmptyTrials { position: 1 },
        &["position 1", "no trials"]
    )]
    #[case::no_index(
        MemoryError::NoIndex,
        &["No retrieval index"]
    )]
    #[case::unsupported_reranker(
        MemoryError::UnsupportedReranker("recency".into()),
        &["Unsupported", "recency"]
    )]
    #[case::insight_out_of_range(
        MemoryError::InsightIndexOutOfRange { position: 7, len: 3 },
        &["position 7", "3 insights"]
    )]
    #[case::invalid_config(
        MemoryError::InvalidConfig("num_folds must be nonzero".into()),
        &["configuration", "num_folds"]
    )]
    fn error_display(#[case] error: MemoryError, #[case] expected: &[&str]) {
        let display = error.to_string();
        for s in expected {
            assert!(display.contains(s), "Expected '{}' in '{}'", s, display);
        }
    }

    #[rstest]
    #[case::no_index(MemoryError::NoIndex, true)]
    #[case::shape(MemoryError::ShapeMismatch { questions: 1, answers: 1, trials: 2, reflections: 0 }, false)]
    #[case::out_of_range(MemoryError::InsightIndexOutOfRange { position: 1, len: 0 }, false)]
    fn is_no_index(#[case] error: MemoryError, #[case] expected: bool) {
        assert_eq!(error.is_no_index(), expected);
    }
}
