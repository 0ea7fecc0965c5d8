//! Working memory — bounded short-term context.
//!
//! Holds the most recent perceptual inputs in a fixed-capacity ring,
//! weights them by relevance and recency, and blends them into one
//! [`IntegratedContext`] per cycle for the downstream processing network.
//!
//! Inserting past capacity silently drops the oldest item; nothing in
//! this module returns an error.

use std::collections::{BTreeMap, VecDeque};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::types::{PerceptualInput, Timestamp};

/// Auxiliary context entries kept alongside the main ring.
const CONTEXT_BUFFER_CAPACITY: usize = 10;

/// Thought lines carried into one integrated context.
const MAX_INTEGRATED_THOUGHTS: usize = 3;
const MAX_TOTAL_THOUGHTS: usize = 5;

/// Memory references carried into one integrated context.
const MAX_INTEGRATED_REFS: usize = 2;
const MAX_TOTAL_REFS: usize = 3;

const MAX_CONTEXT_ENTRIES: usize = 3;

/// One resident item of working memory.
///
/// Created on insert and never mutated afterwards, except for
/// `access_count`, which is informational and plays no role in eviction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingItem {
    /// The perceptual record as received.
    pub content: PerceptualInput,
    /// When the item entered working memory.
    pub timestamp: Timestamp,
    /// How many times the item has been read back.
    pub access_count: u32,
    /// Relevance of the item for conscious processing, in [0, 1].
    pub relevance_score: f32,
}

// Side-buffer entry; evicted oldest-by-timestamp once the buffer is full.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ContextEntry {
    data: serde_json::Value,
    timestamp: Timestamp,
}

/// The blended view of working memory handed to the processing network
/// each cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegratedContext {
    /// Most recent thought lines across resident items (capped).
    pub thoughts: Vec<String>,
    /// Emotion levels merged across items: per emotion, the maximum of
    /// `value × slot weight`.
    pub emotions: BTreeMap<String, f32>,
    /// Most recent memory references across resident items (capped).
    pub memory_refs: Vec<String>,
    /// Latest auxiliary context payloads.
    pub context_entries: Vec<serde_json::Value>,
    /// Buffer fill ratio: resident items / slots.
    pub load: f32,
    /// Per-slot attention weights, in insertion order.
    pub attention: Vec<f32>,
}

/// Point-in-time view of the buffer's state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BufferStatus {
    /// Slots currently occupied.
    pub slots_used: usize,
    /// Slots still free.
    pub slots_available: usize,
    /// Fill ratio.
    pub load: f32,
    /// Age of the oldest resident item, in minutes.
    pub oldest_item_age_minutes: f64,
    /// Mean relevance of resident items.
    pub average_relevance: f32,
    /// Auxiliary context entries currently held.
    pub context_buffer_size: usize,
}

/// Bounded, recency/relevance-weighted short-term context holder.
#[derive(Debug)]
pub struct WorkingBuffer {
    slots: usize,
    items: VecDeque<WorkingItem>,
    attention: Vec<f32>,
    context_buffer: Vec<ContextEntry>,
}

impl WorkingBuffer {
    /// Create a buffer with the given number of slots.
    #[must_use]
    pub fn new(slots: usize) -> Self {
        let slots = slots.max(1);
        info!(slots, "working buffer initialized");
        Self {
            slots,
            items: VecDeque::with_capacity(slots),
            attention: Vec::new(),
            context_buffer: Vec::new(),
        }
    }

    /// Process one perceptual input: insert it, recompute attention, and
    /// return the integrated context for this cycle.
    pub fn process_input(&mut self, input: PerceptualInput) -> IntegratedContext {
        self.add(input);
        self.recompute_attention();
        self.integrate()
    }

    /// Insert a record, evicting the oldest item once the ring is full.
    pub fn add(&mut self, input: PerceptualInput) {
        let item = WorkingItem {
            relevance_score: relevance_of(&input),
            content: input,
            timestamp: Utc::now(),
            access_count: 1,
        };
        self.items.push_back(item);
        if self.items.len() > self.slots {
            self.items.pop_front();
        }
        debug!(slots_used = self.items.len(), "item added to working memory");
    }

    /// Add an auxiliary context payload to the side buffer.
    ///
    /// Once the buffer holds more than its capacity, the entry with the
    /// oldest timestamp is dropped.
    pub fn add_context(&mut self, data: serde_json::Value) {
        self.context_buffer.push(ContextEntry {
            data,
            timestamp: Utc::now(),
        });
        if self.context_buffer.len() > CONTEXT_BUFFER_CAPACITY {
            if let Some(oldest) = self
                .context_buffer
                .iter()
                .enumerate()
                .min_by_key(|(_, e)| e.timestamp)
                .map(|(i, _)| i)
            {
                self.context_buffer.remove(oldest);
            }
        }
    }

    /// Recompute per-slot attention weights.
    ///
    /// Each slot gets its normalized relevance share plus a small recency
    /// bonus proportional to its position; when total relevance is zero,
    /// every weight is zero.
    pub fn recompute_attention(&mut self) {
        self.attention.clear();
        let total: f32 = self.items.iter().map(|i| i.relevance_score).sum();
        if total <= 0.0 {
            self.attention.resize(self.items.len(), 0.0);
            return;
        }
        let n = self.items.len() as f32;
        for (i, item) in self.items.iter().enumerate() {
            let share = item.relevance_score / total;
            let recency_bonus = (i + 1) as f32 / n * 0.1;
            self.attention.push(share + recency_bonus);
        }
    }

    /// Blend resident items into one integrated context.
    #[must_use]
    pub fn integrate(&self) -> IntegratedContext {
        let mut thoughts = Vec::new();
        let mut emotions: BTreeMap<String, f32> = BTreeMap::new();
        let mut memory_refs = Vec::new();

        for (i, item) in self.items.iter().enumerate() {
            let weight = self.attention.get(i).copied().unwrap_or(0.0);
            let content = &item.content;

            let tail = content.thoughts.len().saturating_sub(MAX_INTEGRATED_THOUGHTS);
            thoughts.extend(content.thoughts[tail..].iter().cloned());

            if let Some(context) = &content.emotional_context {
                for (emotion, value) in context {
                    let weighted = value * weight;
                    emotions
                        .entry(emotion.clone())
                        .and_modify(|v| *v = v.max(weighted))
                        .or_insert(weighted);
                }
            }

            let tail = content.memory_refs.len().saturating_sub(MAX_INTEGRATED_REFS);
            memory_refs.extend(content.memory_refs[tail..].iter().cloned());
        }

        keep_tail(&mut thoughts, MAX_TOTAL_THOUGHTS);
        keep_tail(&mut memory_refs, MAX_TOTAL_REFS);

        let tail = self.context_buffer.len().saturating_sub(MAX_CONTEXT_ENTRIES);
        let context_entries = self.context_buffer[tail..]
            .iter()
            .map(|e| e.data.clone())
            .collect();

        IntegratedContext {
            thoughts,
            emotions,
            memory_refs,
            context_entries,
            load: self.items.len() as f32 / self.slots as f32,
            attention: self.attention.clone(),
        }
    }

    /// Current state of the buffer.
    #[must_use]
    pub fn status(&self) -> BufferStatus {
        let average_relevance = if self.items.is_empty() {
            0.0
        } else {
            self.items.iter().map(|i| i.relevance_score).sum::<f32>() / self.items.len() as f32
        };
        let oldest_item_age_minutes = self
            .items
            .front()
            .map(|item| (Utc::now() - item.timestamp).num_milliseconds() as f64 / 60_000.0)
            .unwrap_or(0.0);

        BufferStatus {
            slots_used: self.items.len(),
            slots_available: self.slots - self.items.len(),
            load: self.items.len() as f32 / self.slots as f32,
            oldest_item_age_minutes,
            average_relevance,
            context_buffer_size: self.context_buffer.len(),
        }
    }

    /// Resident items, oldest first.
    #[must_use]
    pub fn items(&self) -> impl Iterator<Item = &WorkingItem> {
        self.items.iter()
    }

    /// Number of resident items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the buffer holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Configured slot count.
    #[must_use]
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Drop all items, attention weights, and auxiliary context.
    pub fn clear(&mut self) {
        self.items.clear();
        self.attention.clear();
        self.context_buffer.clear();
        info!("working buffer cleared");
    }
}

/// Relevance of a record for conscious processing.
///
/// Base 0.5, plus fixed increments for user-authored text, emotional
/// context, and a capture timestamp, capped at 1.0.
fn relevance_of(input: &PerceptualInput) -> f32 {
    let mut relevance: f32 = 0.5;
    if input.user_input.is_some() {
        relevance += 0.3;
    }
    if input.emotional_context.is_some() {
        relevance += 0.2;
    }
    if input.timestamp.is_some() {
        relevance += 0.1;
    }
    relevance.min(1.0)
}

// Truncate from the front so only the most recent `cap` entries remain.
fn keep_tail<T>(items: &mut Vec<T>, cap: usize) {
    if items.len() > cap {
        items.drain(..items.len() - cap);
    }
}
