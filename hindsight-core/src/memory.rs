//! Experience memory: storage, indexing, and fewshot retrieval in one place
//!
//! [`ExperienceMemory`] owns the trajectory store, the retrieval documents
//! projected from successful trials, and the embedding index over them.
//! Appends are cheap: they only mark the index stale. The index is rebuilt
//! from the full document set on the next retrieval (or an explicit
//! [`ExperienceMemory::rebuild_index`]), since the backing index type only
//! supports wholesale builds.
//!
//! # Example
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
//! let fewshots = memory.retrieve(&FewshotRequest::new("capital cities"))?;
//! assert_eq!(fewshots.len(), 1);
//! # Ok(())
//! # }
//! ```

use crate::document::{documents_for_trial, Document, DocumentKind};
use crate::embed::{cosine_distance, Embedder, HashEmbedder};
use crate::error::MemoryError;
use crate::index::{EmbeddingIndex, FlatIndex, IndexEntry};
use crate::store::{RecordBatch, TrajectoryStore};
use crate::tokenize::{Tokenizer, WhitespaceTokenizer};
use crate::trajectory::{TrajectoryId, TrajectoryRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Which query a retrieval searches with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    /// Search with the task query
    #[default]
    Task,

    /// Search with the thought query
    Thought,
}

/// Re-ranking strategy applied to raw index hits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reranker {
    /// Keep the index's similarity order
    #[default]
    None,

    /// Longest owning trajectory first, measured in tokens
    Length,

    /// Rank the owners' thought documents by distance to the thought query.
    ///
    /// Falls back to the index order when the thought query is empty.
    Thought,

    /// Rank by distance to the task query.
    ///
    /// The candidate set is the owners' thought documents, the same set the
    /// `Thought` strategy ranks; only the query differs. Callers tuned to
    /// this ordering depend on it, so the coupling stays.
    Task,
}

impl fmt::Display for Reranker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reranker::None => "none",
            Reranker::Length => "length",
            Reranker::Thought => "thought",
            Reranker::Task => "task",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Reranker {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Reranker::None),
            "length" => Ok(Reranker::Length),
            "thought" => Ok(Reranker::Thought),
            "task" => Ok(Reranker::Task),
            other => Err(MemoryError::UnsupportedReranker(other.to_string())),
        }
    }
}

/// Default number of index hits to pull before filtering.
pub const DEFAULT_K_DOCS: usize = 24;

/// Default per-exemplar token budget.
pub const DEFAULT_MAX_FEWSHOT_TOKENS: usize = 500;

/// Default number of exemplars to return.
pub const DEFAULT_NUM_FEWSHOTS: usize = 6;

/// Parameters for one fewshot retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FewshotRequest {
    /// Query describing the task at hand
    pub task_query: String,

    /// Query describing the agent's current thought (may be empty)
    pub thought_query: String,

    /// Which of the two queries drives the index search
    pub query_kind: QueryKind,

    /// Re-ranking applied to the hits
    pub reranker: Reranker,

    /// Number of index hits to consider
    pub k_docs: usize,

    /// Skip exemplars whose scratchpad exceeds this many tokens
    pub max_fewshot_tokens: usize,

    /// Stop after this many exemplars
    pub num_fewshots: usize,
}

impl Default for FewshotRequest {
    fn default() -> Self {
        Self {
            task_query: String::new(),
            thought_query: String::new(),
            query_kind: QueryKind::default(),
            reranker: Reranker::default(),
            k_docs: DEFAULT_K_DOCS,
            max_fewshot_tokens: DEFAULT_MAX_FEWSHOT_TOKENS,
            num_fewshots: DEFAULT_NUM_FEWSHOTS,
        }
    }
}

impl FewshotRequest {
    /// Create a request that searches with `task_query` and default knobs.
    pub fn new(task_query: impl Into<String>) -> Self {
        Self {
            task_query: task_query.into(),
            ..Self::default()
        }
    }

    /// Set the thought query.
    #[must_use]
    pub fn with_thought_query(mut self, thought_query: impl Into<String>) -> Self {
        self.thought_query = thought_query.into();
        self
    }

    /// Set which query drives the index search.
    #[must_use]
    pub fn with_query_kind(mut self, query_kind: QueryKind) -> Self {
        self.query_kind = query_kind;
        self
    }

    /// Set the re-ranking strategy.
    #[must_use]
    pub fn with_reranker(mut self, reranker: Reranker) -> Self {
        self.reranker = reranker;
        self
    }

    /// Set the number of index hits to consider.
    #[must_use]
    pub fn with_k_docs(mut self, k_docs: usize) -> Self {
        self.k_docs = k_docs;
        self
    }

    /// Set the per-exemplar token budget.
    #[must_use]
    pub fn with_max_fewshot_tokens(mut self, max_fewshot_tokens: usize) -> Self {
        self.max_fewshot_tokens = max_fewshot_tokens;
        self
    }

    /// Set the number of exemplars to return.
    #[must_use]
    pub fn with_num_fewshots(mut self, num_fewshots: usize) -> Self {
        self.num_fewshots = num_fewshots;
        self
    }

    fn query_text(&self) -> &str {
        match self.query_kind {
            QueryKind::Task => &self.task_query,
            QueryKind::Thought => &self.thought_query,
        }
    }
}

/// The experience pool with semantic fewshot retrieval
pub struct ExperienceMemory {
    store: TrajectoryStore,
    documents: Vec<Document>,
    embedder: Arc<dyn Embedder>,
    index: Box<dyn EmbeddingIndex>,
    tokenizer: Box<dyn Tokenizer>,
    strategy: DocumentKind,
    index_stale: bool,
}

impl fmt::Debug for ExperienceMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExperienceMemory")
            .field("records", &self.store.count())
            .field("documents", &self.documents.len())
            .field("strategy", &self.strategy)
            .field("index_stale", &self.index_stale)
            .finish_non_exhaustive()
    }
}

impl Default for ExperienceMemory {
    /// Memory backed by the bundled hash embedder, flat index, and
    /// whitespace tokenizer. Deterministic and dependency-free; swap in
    /// real implementations via [`ExperienceMemory::new`] for production.
    fn default() -> Self {
        Self::new(
            Arc::new(HashEmbedder::new()),
            Box::new(FlatIndex::new()),
            Box::new(WhitespaceTokenizer),
        )
    }
}

impl ExperienceMemory {
    /// Create an empty memory from its collaborators.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Box<dyn EmbeddingIndex>,
        tokenizer: Box<dyn Tokenizer>,
    ) -> Self {
        Self {
            store: TrajectoryStore::new(),
            documents: Vec::new(),
            embedder,
            index,
            tokenizer,
            strategy: DocumentKind::Task,
            index_stale: false,
        }
    }

    /// Set which document kind gets indexed for the initial similarity
    /// search. Defaults to [`DocumentKind::Task`].
    #[must_use]
    pub fn with_strategy(mut self, strategy: DocumentKind) -> Self {
        self.strategy = strategy;
        self.index_stale = !self.documents.is_empty();
        self
    }

    /// Append a batch of records and project retrieval documents from the
    /// ones whose canonical trial succeeded.
    ///
    /// Returns the assigned ids. The index is not rebuilt here, only
    /// marked stale; the next retrieval (or [`Self::rebuild_index`]) pays
    /// the rebuild cost.
    ///
    /// # Errors
    ///
    /// Same contract as [`TrajectoryStore::append`].
    pub fn add_experiences(&mut self, batch: RecordBatch) -> Result<Vec<TrajectoryId>, MemoryError> {
        let ids = self.store.append(batch)?;

        let mut successes = 0;
        for &id in &ids {
            let Some(record) = self.store.get(id) else {
                continue;
            };
            let Some(trial) = record.first_trial() else {
                continue;
            };
            if trial.success {
                let docs = documents_for_trial(id, &record.question, trial);
                self.documents.extend(docs);
                successes += 1;
            }
        }

        if successes > 0 {
            self.index_stale = true;
        }
        log::debug!(
            "appended {} records ({} successful); {} documents total",
            ids.len(),
            successes,
            self.documents.len()
        );

        Ok(ids)
    }

    /// Rebuild the index from every accumulated document of the configured
    /// strategy kind.
    ///
    /// Cost is linear in the number of successful-trajectory documents;
    /// batch appends and rebuild once when loading in bulk.
    pub fn rebuild_index(&mut self) {
        let entries: Vec<IndexEntry> = self
            .documents
            .iter()
            .filter(|doc| doc.kind == self.strategy)
            .map(|doc| IndexEntry {
                document: doc.clone(),
                embedding: self.embedder.embed(&doc.text),
            })
            .collect();

        log::info!(
            "rebuilding retrieval index: {} {} documents (of {} projected)",
            entries.len(),
            self.strategy,
            self.documents.len()
        );

        self.index.build(entries);
        self.index_stale = false;
    }

    /// Retrieve fewshot exemplars for a request.
    ///
    /// Searches the index with the request's query, optionally re-ranks
    /// the hits, then walks candidates resolving each back to its owning
    /// record. A record contributes at most one exemplar per call, and
    /// exemplars whose scratchpad exceeds the token budget are skipped.
    /// Each exemplar is the question followed by the canonical trial's
    /// scratchpad.
    ///
    /// An empty memory returns an empty list. A memory that holds records
    /// but no successful trajectory fails with [`MemoryError::NoIndex`].
    ///
    /// # Errors
    ///
    /// [`MemoryError::NoIndex`] when no successful trajectory is indexed.
    pub fn retrieve(&mut self, request: &FewshotRequest) -> Result<Vec<String>, MemoryError> {
        if self.store.is_empty() {
            return Ok(Vec::new());
        }

        if self.index_stale {
            self.rebuild_index();
        }
        if self.index.is_empty() {
            return Err(MemoryError::NoIndex);
        }

        let query = self.embedder.embed(request.query_text());
        let hits = self.index.search(&query, request.k_docs);
        let ranked = self.rerank(hits, request);

        let mut seen: BTreeSet<TrajectoryId> = BTreeSet::new();
        let mut fewshots = Vec::new();

        for doc in ranked {
            let Some(record) = self.store.get(doc.task_idx) else {
                continue;
            };
            let Some(trial) = record.first_trial() else {
                continue;
            };
            let steps = trial.steps_text();

            if !seen.contains(&doc.task_idx)
                && self.tokenizer.count(&steps) <= request.max_fewshot_tokens
            {
                fewshots.push(format!("{}\n{}", record.question, steps));
                seen.insert(doc.task_idx);
            }

            if fewshots.len() == request.num_fewshots {
                break;
            }
        }

        Ok(fewshots)
    }

    fn rerank(&self, hits: Vec<Document>, request: &FewshotRequest) -> Vec<Document> {
        match request.reranker {
            Reranker::None => hits,
            Reranker::Thought if request.thought_query.is_empty() => hits,
            Reranker::Length => {
                let mut hits = hits;
                hits.sort_by_key(|doc| std::cmp::Reverse(self.owner_steps_tokens(doc)));
                hits
            }
            Reranker::Thought => self.rank_owner_thoughts(&hits, &request.thought_query),
            Reranker::Task => self.rank_owner_thoughts(&hits, &request.task_query),
        }
    }

    /// Token count of the hit owner's canonical scratchpad.
    fn owner_steps_tokens(&self, doc: &Document) -> usize {
        self.store
            .get(doc.task_idx)
            .and_then(TrajectoryRecord::first_trial)
            .map(|trial| self.tokenizer.count(&trial.steps_text()))
            .unwrap_or(0)
    }

    /// Replace the hits with the thought documents of the hit owners,
    /// sorted nearest-to-`query` first.
    fn rank_owner_thoughts(&self, hits: &[Document], query: &str) -> Vec<Document> {
        let owners: BTreeSet<TrajectoryId> = hits.iter().map(|doc| doc.task_idx).collect();
        let query_embedding = self.embedder.embed(query);

        let mut scored: Vec<(f32, &Document)> = self
            .documents
            .iter()
            .filter(|doc| doc.kind == DocumentKind::Thought && owners.contains(&doc.task_idx))
            .map(|doc| {
                let distance = cosine_distance(&self.embedder.embed(&doc.text), &query_embedding);
                (distance, doc)
            })
            .collect();

        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().map(|(_, doc)| doc.clone()).collect()
    }

    /// Look up a record by id.
    pub fn get(&self, id: TrajectoryId) -> Option<&TrajectoryRecord> {
        self.store.get(id)
    }

    /// Number of stored records.
    pub fn count(&self) -> usize {
        self.store.count()
    }

    /// Check if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// All records in id order.
    pub fn records(&self) -> &[TrajectoryRecord] {
        self.store.records()
    }

    /// Ids of all stored records.
    pub fn ids(&self) -> Vec<TrajectoryId> {
        self.store.ids()
    }

    /// All projected retrieval documents, in projection order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// The document kind the index is built over.
    pub fn strategy(&self) -> DocumentKind {
        self.strategy
    }

    /// Whether the index lags the stored documents.
    pub fn is_index_stale(&self) -> bool {
        self.index_stale
    }

    /// Drop all records, documents, and index contents. Id assignment
    /// restarts at zero.
    pub fn clear(&mut self) {
        self.store.clear();
        self.documents.clear();
        self.index.build(Vec::new());
        self.index_stale = false;
        log::debug!("cleared experience memory");
    }
}
