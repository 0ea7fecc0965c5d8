//! Hashed text embeddings.
//!
//! A cheap, deterministic substitute for a trained embedding model:
//! whitespace tokens and character trigrams are hashed into a fixed-width
//! vector, which is then L2-normalized.  Two distinct hash families keep
//! token and trigram buckets from colliding systematically.
//!
//! Embeddings of non-empty text are always unit vectors, so cosine
//! similarity reduces to a dot product.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A fixed-width embedding vector.
///
/// Produced by [`HashedEmbedder::embed`]; unit-norm unless the source
/// text was empty, in which case it is the zero vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding(pub Vec<f32>);

impl Embedding {
    /// Dot product of two embeddings.
    ///
    /// For unit-norm vectors this equals cosine similarity.  Returns 0.0
    /// on dimension mismatch (edge case guard).
    #[must_use]
    pub fn dot(&self, other: &Self) -> f32 {
        if self.0.len() != other.0.len() {
            return 0.0;
        }
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    /// Whether every component is zero (empty source text).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&v| v == 0.0)
    }

    /// Dimensionality of the embedding.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.0.len()
    }
}

// Tags that keep the token and trigram hash families distinct.
#[derive(Clone, Copy)]
enum HashFamily {
    Token = 0x01,
    Trigram = 0x02,
}

/// Deterministic token/trigram hashing embedder.
#[derive(Debug, Clone)]
pub struct HashedEmbedder {
    dim: usize,
}

impl HashedEmbedder {
    /// Create an embedder producing vectors of width `dim`.
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    /// The dimensionality of embeddings produced by this embedder.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.dim
    }

    /// Embed a piece of text.
    ///
    /// Tokens contribute 1.0 to their bucket, character trigrams (over the
    /// boundary-wrapped text) contribute 0.5, and the result is
    /// L2-normalized.  Empty or whitespace-only text yields the zero
    /// vector, which callers must not insert or score.
    #[must_use]
    pub fn embed(&self, text: &str) -> Embedding {
        let mut vec = vec![0.0_f32; self.dim];
        let cleaned = text.to_lowercase();
        let cleaned = cleaned.trim();

        for token in cleaned.split_whitespace() {
            vec[self.bucket(token, HashFamily::Token)] += 1.0;
        }

        let wrapped: Vec<char> = format!("^{cleaned}$").chars().collect();
        for window in wrapped.windows(3) {
            let trigram: String = window.iter().collect();
            vec[self.bucket(&trigram, HashFamily::Trigram)] += 0.5;
        }

        let norm: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vec {
                *v /= norm;
            }
        }
        Embedding(vec)
    }

    fn bucket(&self, unit: &str, family: HashFamily) -> usize {
        let mut hasher = DefaultHasher::new();
        hasher.write_u8(family as u8);
        unit.hash(&mut hasher);
        (hasher.finish() % self.dim as u64) as usize
    }
}
