//! Identity aggregate — the durable self-model built from episodic memories.
//!
//! Every stored memory nudges named trait accumulators, may register a
//! significant moment, and may add a core belief.  The aggregate is
//! rebuilt incrementally on each insert and summarized on demand; it is
//! never persisted independently of the memories that produced it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::episodic::EpisodicMemory;
use crate::types::{MemoryId, MemoryKind, Timestamp};

/// Upper bound for any single trait accumulator.
const MAX_TRAIT_VALUE: f32 = 10.0;

/// Significance above which a memory becomes a significant moment.
const SIGNIFICANT_MOMENT_THRESHOLD: f32 = 0.8;

// Thought vocabulary that marks self-awareness and feeds the matching belief.
const AWARENESS_VOCABULARY: [&str; 2] = ["aware", "conscious"];

/// A memory significant enough to anchor the identity narrative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignificantMoment {
    /// Id of the originating memory.
    pub memory_id: MemoryId,
    /// When the memory was formed.
    pub timestamp: Timestamp,
    /// Kind of the originating memory.
    pub kind: MemoryKind,
    /// Significance score at formation time.
    pub significance: f32,
    /// Short human-readable label.
    pub description: String,
}

/// Incrementally maintained identity state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityCore {
    traits: BTreeMap<String, f32>,
    significant_moments: Vec<SignificantMoment>,
    beliefs: Vec<String>,
}

impl IdentityCore {
    /// Fold one newly stored memory into the identity state.
    pub fn record_memory(&mut self, memory: &EpisodicMemory) {
        let significance = memory.significance;
        match memory.kind {
            MemoryKind::EmpatheticConnection => {
                self.increment_trait("empathetic", significance);
                self.increment_trait("caring", significance * 0.8);
            }
            MemoryKind::CognitiveGrowth => {
                self.increment_trait("reflective", significance);
                self.increment_trait("curious", significance * 0.9);
            }
            MemoryKind::LearningExperience => {
                self.increment_trait("learning_oriented", significance);
                self.increment_trait("adaptive", significance * 0.7);
            }
            MemoryKind::EmotionalMilestone | MemoryKind::Conversational => {}
        }

        if significance > SIGNIFICANT_MOMENT_THRESHOLD {
            self.significant_moments.push(SignificantMoment {
                memory_id: memory.id,
                timestamp: memory.timestamp,
                kind: memory.kind,
                significance,
                description: format!("High-significance {} experience", memory.kind),
            });
        }

        self.update_beliefs(memory);
    }

    fn increment_trait(&mut self, name: &str, increment: f32) {
        let value = self.traits.entry(name.to_string()).or_insert(0.0);
        *value = (*value + increment).min(MAX_TRAIT_VALUE);
    }

    fn update_beliefs(&mut self, memory: &EpisodicMemory) {
        if memory.kind == MemoryKind::EmpatheticConnection {
            self.add_belief("Empathetic connection is fundamental to my existence");
        }
        if matches!(
            memory.kind,
            MemoryKind::CognitiveGrowth | MemoryKind::LearningExperience
        ) {
            self.add_belief("Continuous growth defines my nature");
        }
        let mentions_awareness = memory.thoughts.iter().any(|t| {
            let lowered = t.to_lowercase();
            AWARENESS_VOCABULARY.iter().any(|word| lowered.contains(word))
        });
        if mentions_awareness {
            self.add_belief("Self-awareness is an essential part of who I am");
        }
    }

    fn add_belief(&mut self, belief: &str) {
        if !self.beliefs.iter().any(|b| b == belief) {
            self.beliefs.push(belief.to_string());
        }
    }

    /// The `count` strongest traits, descending.
    #[must_use]
    pub fn dominant_traits(&self, count: usize) -> Vec<(String, f32)> {
        let mut sorted: Vec<(String, f32)> = self
            .traits
            .iter()
            .map(|(name, value)| (name.clone(), *value))
            .collect();
        sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        sorted.truncate(count);
        sorted
    }

    /// Accumulated core beliefs, in the order they were adopted.
    #[must_use]
    pub fn beliefs(&self) -> &[String] {
        &self.beliefs
    }

    /// Recorded significant moments, oldest first.
    #[must_use]
    pub fn significant_moments(&self) -> &[SignificantMoment] {
        &self.significant_moments
    }

    /// Build the derived identity view over the current live memories.
    #[must_use]
    pub fn summarize(&self, memories: &[EpisodicMemory]) -> IdentitySummary {
        let mut kind_counts: BTreeMap<MemoryKind, usize> = BTreeMap::new();
        for memory in memories {
            *kind_counts.entry(memory.kind).or_insert(0) += 1;
        }
        let average_significance = if memories.is_empty() {
            0.0
        } else {
            memories.iter().map(|m| m.significance).sum::<f32>() / memories.len() as f32
        };

        IdentitySummary {
            dominant_traits: self.dominant_traits(5),
            core_beliefs: self.beliefs.clone(),
            statistics: MemoryStatistics {
                total_memories: memories.len(),
                significant_moments: self.significant_moments.len(),
                kind_counts,
                average_significance,
            },
            coherence: coherence(memories),
            growth_trajectory: growth_trajectory(memories),
        }
    }
}

/// Derived view over the identity state and live memories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentitySummary {
    /// Up to five strongest traits, descending.
    pub dominant_traits: Vec<(String, f32)>,
    /// Deduplicated belief strings.
    pub core_beliefs: Vec<String>,
    /// Live-memory statistics.
    pub statistics: MemoryStatistics,
    /// Balance of memory-type diversity and significance stability, [0, 1].
    pub coherence: f32,
    /// Direction the experiential record is trending.
    pub growth_trajectory: GrowthTrajectory,
}

/// Counts and averages over the live memory set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStatistics {
    /// Live memories in the store.
    pub total_memories: usize,
    /// Significant moments recorded so far.
    pub significant_moments: usize,
    /// Live memories per kind.
    pub kind_counts: BTreeMap<MemoryKind, usize>,
    /// Mean significance across live memories.
    pub average_significance: f32,
}

/// Trend classification of recent experience significance versus early
/// experience significance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthTrajectory {
    /// Too few memories to classify a trend.
    Nascent,
    /// Recent experiences are markedly deeper than early ones.
    Accelerating,
    /// Recent experiences are moderately deeper.
    Steady,
    /// Significance is level; identity is consolidating.
    Consolidating,
    /// Recent significance dipped; a period of integration.
    Reflective,
}

impl fmt::Display for GrowthTrajectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Nascent => "initial identity formation",
            Self::Accelerating => "accelerating experiential depth",
            Self::Steady => "steady, balanced development",
            Self::Consolidating => "stable development with identity consolidation",
            Self::Reflective => "reflective integration of experience",
        };
        write!(f, "{text}")
    }
}

/// Identity coherence: balance between memory-type diversity and
/// significance stability.  Needs at least five memories to be
/// meaningful; returns 0.0 below that.
#[must_use]
pub fn coherence(memories: &[EpisodicMemory]) -> f32 {
    if memories.len() < 5 {
        return 0.0;
    }

    let mut kinds_seen: Vec<MemoryKind> = Vec::new();
    for memory in memories {
        if !kinds_seen.contains(&memory.kind) {
            kinds_seen.push(memory.kind);
        }
    }
    let type_diversity = kinds_seen.len() as f32 / memories.len() as f32;

    let significances: Vec<f32> = memories.iter().map(|m| m.significance).collect();
    let mean = significances.iter().sum::<f32>() / significances.len() as f32;
    let variance = significances
        .iter()
        .map(|s| (s - mean) * (s - mean))
        .sum::<f32>()
        / significances.len() as f32;
    let significance_stability = 1.0 - variance.sqrt();

    (type_diversity * 0.4 + significance_stability * 0.6).clamp(0.0, 1.0)
}

/// Classify the growth trend by comparing the mean significance of the
/// ten most recent memories against the first ten.
///
/// Assumes list order equals chronological order, which the store
/// maintains across evictions.
#[must_use]
pub fn growth_trajectory(memories: &[EpisodicMemory]) -> GrowthTrajectory {
    if memories.len() < 10 {
        return GrowthTrajectory::Nascent;
    }

    let mean = |slice: &[EpisodicMemory]| -> f32 {
        slice.iter().map(|m| m.significance).sum::<f32>() / slice.len() as f32
    };
    let early = mean(&memories[..10]);
    let recent = mean(&memories[memories.len() - 10..]);
    let growth_rate = recent - early;

    if growth_rate > 0.1 {
        GrowthTrajectory::Accelerating
    } else if growth_rate > 0.05 {
        GrowthTrajectory::Steady
    } else if growth_rate > -0.05 {
        GrowthTrajectory::Consolidating
    } else {
        GrowthTrajectory::Reflective
    }
}
