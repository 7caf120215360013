//! Nearest-neighbor index over retrieval documents
//!
//! [`EmbeddingIndex`] is a capability trait so an approximate-NN library can
//! replace the bundled [`FlatIndex`] without touching the memory layer. The
//! index is rebuilt wholesale from the accumulated document set; it never
//! supports incremental deletes.

use crate::document::Document;
use crate::embed::cosine_distance;

/// A document paired with its embedding, ready for indexing
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// The document returned by searches
    pub document: Document,

    /// Embedding of the document's text
    pub embedding: Vec<f32>,
}

/// Capability to index embeddings and search by similarity
pub trait EmbeddingIndex: Send {
    /// Replace the index contents with `entries`.
    fn build(&mut self, entries: Vec<IndexEntry>);

    /// Return up to `k` documents nearest to `query`, nearest first.
    fn search(&self, query: &[f32], k: usize) -> Vec<Document>;

    /// Number of indexed entries.
    fn len(&self) -> usize;

    /// Check if the index holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Brute-force cosine index
///
/// Scans every entry per search. O(entries) per query, exact results,
/// no build cost beyond storing the entries.
#[derive(Debug, Clone, Default)]
pub struct FlatIndex {
    entries: Vec<IndexEntry>,
}

impl FlatIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EmbeddingIndex for FlatIndex {
    fn build(&mut self, entries: Vec<IndexEntry>) {
        self.entries = entries;
    }

    fn search(&self, query: &[f32], k: usize) -> Vec<Document> {
        let mut scored: Vec<(f32, &Document)> = self
            .entries
            .iter()
            .map(|entry| (cosine_distance(query, &entry.embedding), &entry.document))
            .collect();

        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        scored
            .into_iter()
            .take(k)
            .map(|(_, doc)| doc.clone())
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
