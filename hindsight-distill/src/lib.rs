//! # Hindsight Distill
//!
//! Insight extraction pipeline over `hindsight-core`.
//!
//! Where the core crate stores trajectories and retrieves fewshot
//! exemplars, this crate closes the learning loop: it walks the stored
//! record pool, asks a language model to critique failures against later
//! successes (and batches of successes against each other), and folds the
//! resulting ADD / AGREE / EDIT / REMOVE operations back into the insight
//! list.
//!
//! The model sits behind the [`LanguageModel`] trait; [`ScriptedModel`]
//! replays canned critiques for offline and deterministic runs.
//!
//! ## Example
//!
//! ```
//! use hindsight_core::{InsightStore, Step, TrajectoryId, TrajectoryRecord, Trial};
//! use hindsight_distill::{ExtractConfig, Extractor, ScriptedModel};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), hindsight_distill::DistillError> {
//! let record = |id: usize, question: &str| TrajectoryRecord {
//!     id: TrajectoryId::new(id),
//!     question: question.into(),
//!     reference_answer: "answer".into(),
//!     trials: vec![Trial::new(
//!         true,
//!         "answer",
//!         vec![Step::new("Look it up", "Search[query]", "found it")],
//!     )],
//!     reflections: vec![],
//! };
//! let records = vec![
//!     record(0, "What is the capital of France?"),
//!     record(1, "Which planet is closest to the sun?"),
//! ];
//!
//! // Two folds, each training on the record the other holds out,
//! // so the model is asked for two success critiques.
//! let model = ScriptedModel::from_responses(vec![
//!     "ADD: Search before guessing.".to_string(),
//!     "AGREE: Search before guessing.".to_string(),
//! ]);
//! let mut insights = InsightStore::default();
//!
//! let report = Extractor::new(ExtractConfig::default())
//!     .extract(&records, &mut insights, &model)
//!     .await?;
//!
//! assert_eq!(report.success_prompts, 2);
//! assert_eq!(report.stats.applied, 2);
//! assert_eq!(insights.len(), 1);
//! assert_eq!(insights.entries()[0].score, 3);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod extract;
pub mod llm;
pub mod ops;
pub mod prompts;

// Re-export public API
pub use error::{DistillError, LmError};
pub use extract::{
    ExtractConfig, ExtractReport, Extractor, DEFAULT_NUM_FOLDS, DEFAULT_SEED,
    DEFAULT_SUCCESS_BATCH_SIZE,
};
pub use llm::{LanguageModel, ScriptedModel};
pub use ops::{parse_operations, sanitize};
pub use prompts::{compare_prompt, success_prompt};
