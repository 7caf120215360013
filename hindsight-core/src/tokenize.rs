//! Token counting for exemplar budgets
//!
//! The memory layer never inspects token ids; it only needs lengths to keep
//! fewshot exemplars under a budget. The trait seam lets callers plug in a
//! real BPE encoder when counts must match a specific model.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Capability to encode text into token ids
pub trait Tokenizer: Send + Sync {
    /// Encode text into token ids.
    fn encode(&self, text: &str) -> Vec<u32>;

    /// Number of tokens in `text`.
    fn count(&self, text: &str) -> usize {
        self.encode(text).len()
    }
}

/// Whitespace-splitting tokenizer
///
/// Counts whitespace-separated words. A crude proxy for model token counts,
/// but monotone in text length, which is all the budget check needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        text.split_whitespace()
            .map(|word| {
                let mut hasher = DefaultHasher::new();
                word.hash(&mut hasher);
                hasher.finish() as u32
            })
            .collect()
    }
}
