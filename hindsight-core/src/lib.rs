//! # Hindsight Core
//!
//! Experiential memory for iterative problem-solving agents.
//!
//! An agent that retries tasks leaves behind trajectories: sequences of
//! think-act-observe steps, final answers, and success judgements. This
//! crate stores those trajectories, projects the successful ones into
//! retrieval documents, and serves two consumers:
//!
//! - **Fewshot retrieval**: [`ExperienceMemory::retrieve`] finds past
//!   successes similar to the task at hand and formats them as in-context
//!   exemplars, with pluggable re-ranking and a per-exemplar token budget.
//! - **Insight curation**: [`InsightStore`] keeps a bounded, scored list of
//!   natural-language rules that an extraction pass (see the companion
//!   `hindsight-distill` crate) revises through ADD / AGREE / EDIT / REMOVE
//!   operations.
//!
//! Embedding, indexing, and tokenization sit behind the [`Embedder`],
//! [`EmbeddingIndex`], and [`Tokenizer`] traits. The bundled
//! implementations ([`HashEmbedder`], [`FlatIndex`],
//! [`WhitespaceTokenizer`]) are deterministic and dependency-free, which
//! keeps tests hermetic; production callers swap in real models.
//!
//! ## Example
//!
//! ```
//! use hindsight_core::{ExperienceMemory, FewshotRequest, RecordBatch, Step, Trial};
//!
//! # fn main() -> Result<(), hindsight_core::MemoryError> {
//! let mut memory = ExperienceMemory::default();
//!
//! memory.add_experiences(RecordBatch::new(
//!     vec!["What is the capital of France?".into()],
//!     vec!["Paris".into()],
//!     vec![vec![Trial::new(
//!         true,
//!         "Paris",
//!         vec![Step::new("Look it up", "Search[capital of France]", "Paris")],
//!     )]],
//! ))?;
//!
//! let fewshots = memory.retrieve(&FewshotRequest::new("European capitals"))?;
//! assert_eq!(fewshots.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod embed;
pub mod error;
pub mod folds;
pub mod index;
pub mod insight;
pub mod memory;
pub mod store;
pub mod tokenize;
pub mod trajectory;

// Re-export public API
pub use document::{documents_for_trial, Document, DocumentKind};
pub use embed::{cosine_distance, Embedder, HashEmbedder, DEFAULT_DIMENSION};
pub use error::MemoryError;
pub use folds::{allocate_folds, categorize, shuffle_chunks, Categories};
pub use index::{EmbeddingIndex, FlatIndex, IndexEntry};
pub use insight::{
    ApplyStats, InsightEntry, InsightStore, OpOutcome, Operation, SkipReason, DEFAULT_MAX_INSIGHTS,
};
pub use memory::{
    ExperienceMemory, FewshotRequest, QueryKind, Reranker, DEFAULT_K_DOCS,
    DEFAULT_MAX_FEWSHOT_TOKENS, DEFAULT_NUM_FEWSHOTS,
};
pub use store::{RecordBatch, TrajectoryStore};
pub use tokenize::{Tokenizer, WhitespaceTokenizer};
pub use trajectory::{Step, Trial, TrajectoryId, TrajectoryRecord};
