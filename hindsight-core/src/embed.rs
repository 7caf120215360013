//! Text embedding for semantic retrieval
//!
//! [`Embedder`] is the seam where a real embedding model plugs in. The
//! bundled [`HashEmbedder`] is a deterministic stand-in: it feature-hashes
//! words into a fixed-width vector, so texts that share vocabulary land
//! nearer each other than unrelated texts. Good enough for tests and
//! offline runs, no substitute for a learned model.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Capability to embed text into a fixed-length vector
pub trait Embedder: Send + Sync {
    /// Embed text. All outputs from one embedder have the same length.
    fn embed(&self, text: &str) -> Vec<f32>;
}

/// Default embedding width, matching common sentence-transformer models.
pub const DEFAULT_DIMENSION: usize = 384;

/// Deterministic hash-based embedder
///
/// Each lowercased word is hashed to a coordinate and a sign; the resulting
/// bag-of-words vector is L2-normalized. Identical texts embed identically
/// on every platform and run.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
        }
    }
}

impl HashEmbedder {
    /// Create an embedder with the default dimension.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the embedding width.
    #[must_use]
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension.max(1);
        self
    }

    /// The width of vectors this embedder produces.
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for word in text.split_whitespace() {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            let hash = hasher.finish();

            let coordinate = (hash as usize) % self.dimension;
            let sign = if hash & (1 << 63) == 0 { 1.0 } else { -1.0 };
            vector[coordinate] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }
}

/// Cosine distance between two vectors: `1 - cosine_similarity`.
///
/// Returns the maximum distance (`1.0`) when either vector is zero or the
/// lengths differ, so degenerate inputs sort last instead of panicking.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 1.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    1.0 - dot / (norm_a * norm_b)
}
