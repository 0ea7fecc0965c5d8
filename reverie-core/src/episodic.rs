//! Episodic memory — capacity-bounded, significance-scored long-term store.
//!
//! Experiences are scored at encoding time; only sufficiently significant
//! ones become memories.  When the store outgrows its capacity, the
//! weakest memories are evicted and reduced to consolidated summaries.
//! A session-end consolidation pass raises the durability of everything
//! that survived.
//!
//! Memory lifecycle: created → live (consolidation level rising over
//! session ticks) → evicted-and-consolidated.  An evicted memory never
//! re-enters the live store and never reappears in retrieval.

use std::collections::{HashSet, VecDeque};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::identity::{IdentityCore, IdentitySummary};
use crate::types::{
    EmotionalSnapshot, ExperienceContext, MemoryId, MemoryKind, RelevanceScore, Timestamp,
};

/// Experiences scoring below this are not stored at all.
const STORAGE_THRESHOLD: f32 = 0.3;

/// Fraction of capacity retained by an eviction pass.
const RETENTION_RATIO: f32 = 0.9;

/// Retrieval candidates must score strictly above this.
const RETRIEVAL_THRESHOLD: f32 = 0.3;

/// User text longer than this counts as a substantial interaction.
const SUBSTANTIAL_INPUT_CHARS: usize = 50;

// Thought vocabulary marking metacognition and learning, checked lowercase.
const METACOGNITIVE_VOCABULARY: [&str; 2] = ["metacogni", "thinking about my thinking"];
const LEARNING_VOCABULARY: [&str; 2] = ["learn", "understand"];

/// One stored experience.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodicMemory {
    /// Monotonic identifier, allocated by the store.
    pub id: MemoryId,
    /// When the experience happened.
    pub timestamp: Timestamp,
    /// How significant the experience was, in [0, 1].
    pub significance: f32,
    /// Scalar summary of the processing network's state at encoding time.
    pub awareness_level: f32,
    /// Emotional snapshot at encoding time.
    pub emotions: EmotionalSnapshot,
    /// Thoughts associated with the experience.
    pub thoughts: Vec<String>,
    /// Interaction context of the experience.
    pub context: ExperienceContext,
    /// Classification assigned at encoding time.
    pub kind: MemoryKind,
    /// Durability indicator raised by session consolidation, in [0, 1].
    pub consolidation_level: f32,
}

/// Reduced summary of an evicted memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidatedMemory {
    /// Id the memory had while live.
    pub original_id: MemoryId,
    /// Original experience timestamp.
    pub timestamp: Timestamp,
    /// Original classification.
    pub kind: MemoryKind,
    /// Original significance score.
    pub significance: f32,
    /// Dominant emotion label at encoding time.
    pub dominant_emotion: String,
    /// The first two thoughts of the original memory.
    pub key_thoughts: Vec<String>,
    /// Always 1.0 — consolidation is complete by definition here.
    pub consolidation_level: f32,
}

/// Context a caller supplies when asking for relevant memories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalQuery {
    /// Restrict affinity to this memory kind.
    #[serde(default)]
    pub kind: Option<MemoryKind>,
    /// Prefer memories whose dominant emotion matches this label.
    #[serde(default)]
    pub primary_emotion: Option<String>,
}

/// Capacity-bounded, significance-scored long-term memory store.
#[derive(Debug)]
pub struct EpisodicStore {
    capacity: usize,
    consolidation_rate: f32,
    next_id: u64,
    last_timestamp: Option<Timestamp>,
    memories: Vec<EpisodicMemory>,
    identity: IdentityCore,
    consolidated: VecDeque<ConsolidatedMemory>,
}

impl EpisodicStore {
    /// Create a store with the given capacity and per-tick consolidation
    /// rate.
    #[must_use]
    pub fn new(capacity: usize, consolidation_rate: f32) -> Self {
        let capacity = capacity.max(1);
        info!(capacity, "episodic store initialized");
        Self {
            capacity,
            consolidation_rate,
            next_id: 0,
            last_timestamp: None,
            memories: Vec::new(),
            identity: IdentityCore::default(),
            consolidated: VecDeque::new(),
        }
    }

    /// Encode one experience, storing it if it is significant enough.
    ///
    /// Returns the stored memory, or `None` when the experience scored
    /// below the storage threshold — a normal outcome, not a failure.
    pub fn encode_experience(
        &mut self,
        timestamp: Timestamp,
        awareness: f32,
        emotions: EmotionalSnapshot,
        thoughts: Vec<String>,
        context: ExperienceContext,
    ) -> Option<EpisodicMemory> {
        if let Some(last) = self.last_timestamp {
            if timestamp < last {
                warn!(%timestamp, %last, "experience timestamps regressed; trend analysis may skew");
            }
        }
        self.last_timestamp = Some(timestamp);

        let significance = evaluate_significance(&emotions, &thoughts, &context);
        if significance < STORAGE_THRESHOLD {
            debug!(significance, "experience below storage threshold, no memory created");
            return None;
        }

        let memory = EpisodicMemory {
            id: MemoryId(self.next_id),
            timestamp,
            significance,
            awareness_level: awareness,
            kind: classify(&emotions, &thoughts),
            emotions,
            thoughts,
            context,
            consolidation_level: 0.0,
        };
        self.next_id += 1;

        self.identity.record_memory(&memory);
        self.memories.push(memory.clone());
        self.enforce_capacity();

        debug!(significance, kind = %memory.kind, "experience encoded");
        Some(memory)
    }

    /// Retrieve the live memories most relevant to `query`, best first.
    ///
    /// Only memories scoring strictly above the retrieval threshold are
    /// candidates; evicted memories are gone and can never match.
    #[must_use]
    pub fn retrieve_memories(
        &self,
        query: &RetrievalQuery,
        max_results: usize,
    ) -> Vec<EpisodicMemory> {
        let mut scored: Vec<(RelevanceScore, &EpisodicMemory)> = self
            .memories
            .iter()
            .filter_map(|memory| {
                let score = retrieval_relevance(memory, query);
                (score > RETRIEVAL_THRESHOLD)
                    .then(|| (RelevanceScore::new(score), memory))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored
            .into_iter()
            .take(max_results)
            .map(|(_, memory)| memory.clone())
            .collect()
    }

    /// Derived identity view over the current live memories.
    #[must_use]
    pub fn identity_summary(&self) -> IdentitySummary {
        self.identity.summarize(&self.memories)
    }

    /// Session-end consolidation: raise every live memory's durability by
    /// the configured rate, capped at 1.0.
    pub fn consolidate_session(&mut self) {
        for memory in &mut self.memories {
            memory.consolidation_level =
                (memory.consolidation_level + self.consolidation_rate).min(1.0);
        }
        info!(memories = self.memories.len(), "session memories consolidated");
    }

    // Keep the strongest memories when over capacity; summarize the rest.
    //
    // The keep-set is chosen by (significance, consolidation level)
    // descending, but survivors stay in chronological insertion order so
    // list order keeps matching timestamp order.
    fn enforce_capacity(&mut self) {
        if self.memories.len() <= self.capacity {
            return;
        }

        let keep = (self.capacity as f32 * RETENTION_RATIO) as usize;
        let mut ranked: Vec<usize> = (0..self.memories.len()).collect();
        ranked.sort_by_key(|&i| {
            let memory = &self.memories[i];
            std::cmp::Reverse((
                OrderedFloat(memory.significance),
                OrderedFloat(memory.consolidation_level),
            ))
        });
        let keep_set: HashSet<usize> = ranked.into_iter().take(keep).collect();

        let mut survivors = Vec::with_capacity(keep);
        let mut evicted = 0_usize;
        for (i, memory) in self.memories.drain(..).enumerate() {
            if keep_set.contains(&i) {
                survivors.push(memory);
            } else {
                evicted += 1;
                self.consolidated.push_back(summarize(memory));
            }
        }
        self.memories = survivors;

        let summary_bound = (self.capacity / 10).max(1);
        while self.consolidated.len() > summary_bound {
            self.consolidated.pop_front();
        }

        info!(live = self.memories.len(), evicted, "episodic eviction pass complete");
    }

    /// Summaries of evicted memories, oldest first.
    ///
    /// Kept in a bounded side ring for inspection; these never return to
    /// the live store.
    pub fn consolidated_summaries(&self) -> impl Iterator<Item = &ConsolidatedMemory> {
        self.consolidated.iter()
    }

    /// Live memories, in chronological insertion order.
    pub fn memories(&self) -> impl Iterator<Item = &EpisodicMemory> {
        self.memories.iter()
    }

    /// Number of live memories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.memories.len()
    }

    /// Whether the store holds no live memories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }

    /// Configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether a live memory with the given id exists.
    #[must_use]
    pub fn contains(&self, id: MemoryId) -> bool {
        self.memories.iter().any(|m| m.id == id)
    }
}

/// Score the significance of an experience.
///
/// Weighted blend of emotional depth, thought depth, and interaction
/// context; every sub-term is clamped before weighting and the result is
/// clamped to [0, 1].
#[must_use]
pub fn evaluate_significance(
    emotions: &EmotionalSnapshot,
    thoughts: &[String],
    context: &ExperienceContext,
) -> f32 {
    let empathy = emotions.empathy_level.clamp(0.0, 1.0);
    let intensity = emotions.primary_intensity.clamp(0.0, 1.0);
    let complexity = emotions.complexity.clamp(0.0, 1.0);

    let mut significance = (empathy + intensity + complexity) / 3.0 * 0.4;
    significance += (thoughts.len() as f32 / 10.0).min(1.0) * 0.3;
    if context.is_direct_communication() {
        significance += 0.2;
    }
    let substantial_input = context
        .user_input
        .as_ref()
        .is_some_and(|text| text.chars().count() > SUBSTANTIAL_INPUT_CHARS);
    if substantial_input {
        significance += 0.1;
    }

    significance.clamp(0.0, 1.0)
}

/// Classify an experience; first matching rule wins.
#[must_use]
pub fn classify(emotions: &EmotionalSnapshot, thoughts: &[String]) -> MemoryKind {
    if emotions.empathy_level > 0.6 {
        return MemoryKind::EmpatheticConnection;
    }
    if thoughts.len() > 5 && any_thought_contains(thoughts, &METACOGNITIVE_VOCABULARY) {
        return MemoryKind::CognitiveGrowth;
    }
    if emotions.primary_intensity > 0.7 {
        return MemoryKind::EmotionalMilestone;
    }
    if any_thought_contains(thoughts, &LEARNING_VOCABULARY) {
        return MemoryKind::LearningExperience;
    }
    MemoryKind::Conversational
}

fn any_thought_contains(thoughts: &[String], vocabulary: &[&str]) -> bool {
    thoughts.iter().any(|thought| {
        let lowered = thought.to_lowercase();
        vocabulary.iter().any(|word| lowered.contains(word))
    })
}

// Relevance of one live memory for a retrieval query.
fn retrieval_relevance(memory: &EpisodicMemory, query: &RetrievalQuery) -> f32 {
    let mut relevance = 0.0;
    if query.kind == Some(memory.kind) {
        relevance += 0.4;
    }
    if let (Some(wanted), Some(stored)) = (&query.primary_emotion, &memory.emotions.primary_emotion)
    {
        if wanted == stored {
            relevance += 0.3;
        }
    }
    relevance += memory.significance * 0.3;
    relevance.min(1.0)
}

fn summarize(memory: EpisodicMemory) -> ConsolidatedMemory {
    ConsolidatedMemory {
        original_id: memory.id,
        timestamp: memory.timestamp,
        kind: memory.kind,
        significance: memory.significance,
        dominant_emotion: memory.emotions.dominant_emotion().to_string(),
        key_thoughts: memory.thoughts.into_iter().take(2).collect(),
        consolidation_level: 1.0,
    }
}
