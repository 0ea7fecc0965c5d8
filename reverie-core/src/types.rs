//! Core type definitions for the reverie memory system.
//!
//! All records are serializable; opaque dynamic payloads from the host
//! (emotion readings, interaction context) are modeled as structs with
//! named optional fields so that unknown keys are ignored on deserialize
//! and missing fields score as zero.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Unique identifier for an episodic memory.
///
/// Ids are allocated monotonically by the store, so a larger id always
/// means a later memory within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MemoryId(pub u64);

impl fmt::Display for MemoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Wall-clock timestamp used across the memory system.
pub type Timestamp = DateTime<Utc>;

// ---------------------------------------------------------------------------
// Memory classification
// ---------------------------------------------------------------------------

/// Kind of an episodic memory, assigned at encoding time.
///
/// Classification is evaluated in this priority order — first match wins
/// (empathy before cognition before raw intensity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    /// A strongly empathetic exchange with the user.
    EmpatheticConnection,
    /// A burst of metacognitive thinking.
    CognitiveGrowth,
    /// An emotionally intense moment.
    EmotionalMilestone,
    /// An experience centered on learning or understanding something new.
    LearningExperience,
    /// Everyday conversational exchange.
    Conversational,
}

impl fmt::Display for MemoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EmpatheticConnection => "empathetic_connection",
            Self::CognitiveGrowth => "cognitive_growth",
            Self::EmotionalMilestone => "emotional_milestone",
            Self::LearningExperience => "learning_experience",
            Self::Conversational => "conversational",
        };
        write!(f, "{name}")
    }
}

impl MemoryKind {
    /// All kinds, in classification priority order.
    pub const ALL: [Self; 5] = [
        Self::EmpatheticConnection,
        Self::CognitiveGrowth,
        Self::EmotionalMilestone,
        Self::LearningExperience,
        Self::Conversational,
    ];
}

// ---------------------------------------------------------------------------
// Host-supplied records
// ---------------------------------------------------------------------------

/// One perceptual input record, as handed to the working buffer each cycle.
///
/// Every field is optional from the host's point of view; absent fields
/// simply contribute nothing to relevance scoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerceptualInput {
    /// User-authored text, if this cycle carries any.
    #[serde(default)]
    pub user_input: Option<String>,
    /// Active emotion levels by name at perception time.
    #[serde(default)]
    pub emotional_context: Option<BTreeMap<String, f32>>,
    /// When the input was captured.
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    /// Thoughts carried over from previous cycles.
    #[serde(default)]
    pub thoughts: Vec<String>,
    /// References to recently formed memories.
    #[serde(default)]
    pub memory_refs: Vec<String>,
}

impl PerceptualInput {
    /// Shorthand for an input that carries only user text.
    #[must_use]
    pub fn from_user_text(text: impl Into<String>) -> Self {
        Self {
            user_input: Some(text.into()),
            ..Self::default()
        }
    }
}

/// Snapshot of the emotion subsystem's output for one cycle.
///
/// Missing readings default to zero; the scoring code clamps every
/// sub-term into [0, 1] before weighting, so a misbehaving host cannot
/// push significance out of range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmotionalSnapshot {
    /// Dominant emotion label, if one was detected.
    #[serde(default)]
    pub primary_emotion: Option<String>,
    /// Intensity of the dominant emotion.
    #[serde(default)]
    pub primary_intensity: f32,
    /// How blended / multi-emotion the state is.
    #[serde(default)]
    pub complexity: f32,
    /// Strength of the empathetic response toward the user.
    #[serde(default)]
    pub empathy_level: f32,
    /// Full emotion activation map by name.
    #[serde(default)]
    pub activations: BTreeMap<String, f32>,
}

impl EmotionalSnapshot {
    /// A fully neutral snapshot.
    #[must_use]
    pub fn neutral() -> Self {
        Self::default()
    }

    /// The dominant emotion label, or `"neutral"` when none was detected.
    #[must_use]
    pub fn dominant_emotion(&self) -> &str {
        self.primary_emotion.as_deref().unwrap_or("neutral")
    }
}

/// Interaction context attached to an experience at encoding time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceContext {
    /// How the experience originated (e.g. `"direct_communication"`).
    #[serde(default)]
    pub interaction_type: Option<String>,
    /// User-authored text involved in the experience, if any.
    #[serde(default)]
    pub user_input: Option<String>,
}

/// Interaction type that marks a direct exchange with the user.
pub const DIRECT_COMMUNICATION: &str = "direct_communication";

impl ExperienceContext {
    /// Whether this experience came from a direct user exchange.
    #[must_use]
    pub fn is_direct_communication(&self) -> bool {
        self.interaction_type.as_deref() == Some(DIRECT_COMMUNICATION)
    }
}

// ---------------------------------------------------------------------------
// Relevance Score
// ---------------------------------------------------------------------------

/// Total-ordered score used to rank retrieval candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RelevanceScore(pub OrderedFloat<f32>);

impl RelevanceScore {
    /// Create a relevance score from a raw f32.
    #[must_use]
    pub fn new(score: f32) -> Self {
        Self(OrderedFloat(score))
    }

    /// Get the raw score value.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0.into_inner()
    }
}
