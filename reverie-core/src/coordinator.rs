//! Memory coordinator — composes the three stores into one pipeline.
//!
//! Each cycle: perceptual input flows into the working buffer to build a
//! processing context; once the host has computed the cycle's
//! consciousness/emotion/thought snapshot, the resulting experience is
//! offered to the episodic store; the semantic index supplies
//! retrieval-augmented context on demand.
//!
//! Every store sits behind its own exclusive-write lock: read-only
//! queries run concurrently against a stable snapshot, while an encode
//! (including any eviction pass it triggers) commits atomically under a
//! single write-lock hold — a cancelled host task can never observe a
//! partially evicted store.  Scoring itself is pure and total, so the
//! only "failure" the coordinator ever reports is the normal
//! no-memory-created outcome, logged at debug level.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::config::CoreConfig;
use crate::episodic::{EpisodicMemory, EpisodicStore, RetrievalQuery};
use crate::identity::IdentitySummary;
use crate::semantic::{SemanticHit, SemanticIndex};
use crate::types::{EmotionalSnapshot, ExperienceContext, PerceptualInput, Timestamp};
use crate::working::{BufferStatus, IntegratedContext, WorkingBuffer};

/// Snippets recalled per augmented perception cycle.
const RECALL_SNIPPETS: usize = 3;

/// Point-in-time view across all three stores.
#[derive(Debug, Clone)]
pub struct MemoryStatus {
    /// Working buffer state.
    pub working: BufferStatus,
    /// Live episodic memories.
    pub episodic_memories: usize,
    /// Stored semantic records.
    pub semantic_records: usize,
}

/// Coordinates the working buffer, episodic store, and semantic index.
pub struct MemoryCoordinator {
    working: RwLock<WorkingBuffer>,
    episodic: RwLock<EpisodicStore>,
    semantic: RwLock<SemanticIndex>,
}

impl MemoryCoordinator {
    /// Build a coordinator from configuration.
    #[must_use]
    pub fn new(config: &CoreConfig) -> Self {
        let memory = &config.memory;
        info!("memory coordinator initialized");
        Self {
            working: RwLock::new(WorkingBuffer::new(memory.working_memory_slots)),
            episodic: RwLock::new(EpisodicStore::new(
                memory.autobiographical_capacity,
                memory.memory_consolidation_rate,
            )),
            semantic: RwLock::new(SemanticIndex::new(
                memory.embedding_dim,
                memory.semantic_max_items,
            )),
        }
    }

    /// Run one working-memory cycle: insert the input and return the
    /// integrated context for downstream processing.
    pub fn perceive(&self, input: PerceptualInput) -> IntegratedContext {
        self.working.write().process_input(input)
    }

    /// Like [`perceive`](Self::perceive), but first augments the input
    /// with the semantic records most similar to its user text, so the
    /// integrated context carries recalled prior conversation.
    pub fn perceive_with_recall(&self, mut input: PerceptualInput) -> IntegratedContext {
        if let Some(text) = input.user_input.clone() {
            let snippets = self.semantic.read().build_context_snippets(&text, RECALL_SNIPPETS);
            if !snippets.is_empty() {
                debug!(recalled = snippets.len(), "augmenting perception with recalled context");
                input.memory_refs.extend(snippets);
            }
        }
        self.perceive(input)
    }

    /// Offer one computed experience to the episodic store.
    ///
    /// Returns the stored memory, or `None` when the experience was not
    /// significant enough — an expected outcome of most cycles.
    pub fn commit_experience(
        &self,
        timestamp: Timestamp,
        awareness: f32,
        emotions: EmotionalSnapshot,
        thoughts: Vec<String>,
        context: ExperienceContext,
    ) -> Option<EpisodicMemory> {
        let stored = self
            .episodic
            .write()
            .encode_experience(timestamp, awareness, emotions, thoughts, context);
        if stored.is_none() {
            debug!("cycle produced no memory");
        }
        stored
    }

    /// Store a text record in the semantic index.
    pub fn remember_text(
        &self,
        id: impl Into<String>,
        text: impl Into<String>,
        metadata: BTreeMap<String, String>,
    ) {
        self.semantic.write().add_memory(id, text, metadata);
    }

    /// Query the semantic index for the records most similar to `text`.
    #[must_use]
    pub fn recall_similar(&self, text: &str, top_k: usize) -> Vec<SemanticHit> {
        self.semantic.read().query(text, top_k)
    }

    /// Retrieve the episodic memories most relevant to `query`.
    #[must_use]
    pub fn retrieve_episodes(
        &self,
        query: &RetrievalQuery,
        max_results: usize,
    ) -> Vec<EpisodicMemory> {
        self.episodic.read().retrieve_memories(query, max_results)
    }

    /// Derived identity view over the episodic store.
    #[must_use]
    pub fn identity_summary(&self) -> IdentitySummary {
        self.episodic.read().identity_summary()
    }

    /// Add an auxiliary context payload to the working buffer.
    pub fn add_context(&self, data: serde_json::Value) {
        self.working.write().add_context(data);
    }

    /// Point-in-time status across all stores.
    #[must_use]
    pub fn status(&self) -> MemoryStatus {
        MemoryStatus {
            working: self.working.read().status(),
            episodic_memories: self.episodic.read().len(),
            semantic_records: self.semantic.read().len(),
        }
    }

    /// Session shutdown: consolidate what the session retained.
    ///
    /// Called once when the host winds down; raises every live episodic
    /// memory's durability by the configured rate.
    pub fn shutdown(&self) {
        self.episodic.write().consolidate_session();
        info!("memory coordinator shut down");
    }
}
