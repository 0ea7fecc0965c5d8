//! Configuration for the reverie memory core.
//!
//! Loadable from TOML (`reverie.toml`) or from the host's JSON settings
//! blob — the embedding host historically ships JSON.  Every option has a
//! default, and unknown keys are ignored so host configs can carry
//! sections this core does not consume.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the memory core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoreConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Capacity and rate settings for the three stores.
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl CoreConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns [`crate::CoreError::Config`] if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::CoreError::Config(e.to_string()))
    }

    /// Load configuration from a JSON string.
    ///
    /// # Errors
    /// Returns [`crate::CoreError::Config`] if the JSON is invalid.
    pub fn from_json(json_str: &str) -> crate::error::Result<Self> {
        serde_json::from_str(json_str).map_err(|e| crate::CoreError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Store capacities and consolidation tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Working buffer capacity (cognitive-science default of 7 slots).
    #[serde(default = "default_7")]
    pub working_memory_slots: usize,
    /// Hard cap on live episodic memories.
    #[serde(default = "default_10000")]
    pub autobiographical_capacity: usize,
    /// Consolidation-level increment applied per session tick.
    #[serde(default = "default_0_1")]
    pub memory_consolidation_rate: f32,
    /// Semantic index vector width.
    #[serde(default = "default_512")]
    pub embedding_dim: usize,
    /// Semantic index capacity (FIFO-bounded).
    #[serde(default = "default_5000")]
    pub semantic_max_items: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            working_memory_slots: 7,
            autobiographical_capacity: 10_000,
            memory_consolidation_rate: 0.1,
            embedding_dim: 512,
            semantic_max_items: 5_000,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_log_level() -> String { "info".to_string() }
fn default_0_1() -> f32 { 0.1 }
fn default_7() -> usize { 7 }
fn default_512() -> usize { 512 }
fn default_5000() -> usize { 5_000 }
fn default_10000() -> usize { 10_000 }
