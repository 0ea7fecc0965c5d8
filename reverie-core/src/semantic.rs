//! Semantic index — hashed-embedding store with top-k similarity queries.
//!
//! Records are embedded once on insert and are immutable afterwards.
//! The store is FIFO-bounded: inserting past capacity silently drops the
//! oldest record.  Queries score every stored vector by dot product
//! (cosine similarity over unit vectors) and return the best matches in
//! descending order.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::embedding::{Embedding, HashedEmbedder};
use crate::types::RelevanceScore;

/// A stored text record with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticRecord {
    /// Caller-assigned identifier.
    pub id: String,
    /// The stored text.
    pub text: String,
    /// Free-form metadata attached at insert time.
    pub metadata: BTreeMap<String, String>,
    /// Unit-norm embedding of `text`.
    pub embedding: Embedding,
}

/// One query result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticHit {
    /// Identifier of the matching record.
    pub id: String,
    /// Text of the matching record.
    pub text: String,
    /// Metadata of the matching record.
    pub metadata: BTreeMap<String, String>,
    /// Cosine similarity to the query, in [-1, 1] (non-negative in
    /// practice since hashed embeddings have no negative components).
    pub score: f32,
}

/// Fixed-dimension hashed-embedding store supporting add and top-k
/// cosine-similarity query.
#[derive(Debug)]
pub struct SemanticIndex {
    embedder: HashedEmbedder,
    max_items: usize,
    records: VecDeque<SemanticRecord>,
}

impl SemanticIndex {
    /// Create an index with the given vector width and capacity.
    #[must_use]
    pub fn new(embedding_dim: usize, max_items: usize) -> Self {
        let max_items = max_items.max(1);
        info!(embedding_dim, max_items, "semantic index initialized");
        Self {
            embedder: HashedEmbedder::new(embedding_dim),
            max_items,
            records: VecDeque::new(),
        }
    }

    /// Insert a text record.
    ///
    /// Empty or whitespace-only text is a no-op (its embedding would be
    /// the zero vector, which is never stored).  Inserting past capacity
    /// drops the oldest record.
    pub fn add_memory(
        &mut self,
        id: impl Into<String>,
        text: impl Into<String>,
        metadata: BTreeMap<String, String>,
    ) {
        let text = text.into();
        let embedding = self.embedder.embed(&text);
        if embedding.is_zero() {
            return;
        }
        self.records.push_back(SemanticRecord {
            id: id.into(),
            text,
            metadata,
            embedding,
        });
        if self.records.len() > self.max_items {
            self.records.pop_front();
        }
        debug!(stored = self.records.len(), "semantic record added");
    }

    /// Retrieve the records most similar to `text`, best first.
    ///
    /// `top_k` is clamped to at least 1.  Empty query text or an empty
    /// index yields an empty result, never an error.
    #[must_use]
    pub fn query(&self, text: &str, top_k: usize) -> Vec<SemanticHit> {
        if self.records.is_empty() {
            return Vec::new();
        }
        let query_embedding = self.embedder.embed(text);
        if query_embedding.is_zero() {
            return Vec::new();
        }

        let mut scored: Vec<(RelevanceScore, &SemanticRecord)> = self
            .records
            .iter()
            .map(|record| {
                (
                    RelevanceScore::new(query_embedding.dot(&record.embedding)),
                    record,
                )
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored
            .into_iter()
            .take(top_k.max(1))
            .map(|(score, record)| SemanticHit {
                id: record.id.clone(),
                text: record.text.clone(),
                metadata: record.metadata.clone(),
                score: score.value(),
            })
            .collect()
    }

    /// Retrieve only the text fragments of the best matches, for
    /// injection into a downstream prompt or context window.
    #[must_use]
    pub fn build_context_snippets(&self, text: &str, top_k: usize) -> Vec<String> {
        self.query(text, top_k)
            .into_iter()
            .map(|hit| hit.text)
            .collect()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Configured capacity.
    #[must_use]
    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Whether a record with the given id is currently stored.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.records.iter().any(|r| r.id == id)
    }
}
