//! # Reverie Core Library
//!
//! Layered memory core for embodied conversational agents.
//!
//! An agent gets one [`MemoryCoordinator`] composing three stores:
//!
//! - **Working** — "What I'm attending to": a bounded,
//!   relevance-weighted short-term context ring.
//! - **Episodic** — "What I've lived": significance-gated long-term
//!   experiences with eviction-time consolidation.
//! - **Semantic** — "What was said": a hashed-embedding index over prior
//!   text with top-k cosine retrieval.
//!
//! ## Degradation Contract
//!
//! The core never aborts a processing cycle.  Empty inputs are no-ops,
//! capacity overflow evicts silently, and sub-threshold experiences
//! simply produce no memory.  Scoring, bounding, eviction, and
//! similarity search are deterministic, synchronous, and CPU-bound.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod coordinator;
pub mod embedding;
pub mod episodic;
pub mod error;
pub mod identity;
pub mod semantic;
pub mod types;
pub mod working;

pub use config::CoreConfig;
pub use coordinator::MemoryCoordinator;
pub use episodic::EpisodicStore;
pub use error::CoreError;
pub use semantic::SemanticIndex;
pub use types::*;
pub use working::WorkingBuffer;
