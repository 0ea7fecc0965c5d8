//! Integration tests — end-to-end memory pipeline flows.
//!
//! These exercise complete scenarios across the coordinator: perception
//! cycles, experience encoding, similarity recall, capacity eviction,
//! identity formation, and session shutdown.

use std::collections::BTreeMap;

use chrono::Utc;

use reverie_core::config::CoreConfig;
use reverie_core::coordinator::MemoryCoordinator;
use reverie_core::episodic::{EpisodicStore, RetrievalQuery};
use reverie_core::semantic::SemanticIndex;
use reverie_core::types::{
    DIRECT_COMMUNICATION, EmotionalSnapshot, ExperienceContext, MemoryKind, PerceptualInput,
};
use reverie_core::working::WorkingBuffer;

// Capture core logs when a test run needs them (RUST_LOG=reverie_core=debug).
fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

fn empathetic(empathy: f32, intensity: f32) -> EmotionalSnapshot {
    EmotionalSnapshot {
        primary_emotion: Some("warmth".to_string()),
        primary_intensity: intensity,
        empathy_level: empathy,
        complexity: 0.2,
        ..EmotionalSnapshot::default()
    }
}

fn direct(user_text: &str) -> ExperienceContext {
    ExperienceContext {
        interaction_type: Some(DIRECT_COMMUNICATION.to_string()),
        user_input: Some(user_text.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Full pipeline: perceive → commit → recall → identity → shutdown
// ---------------------------------------------------------------------------

#[test]
fn full_session_lifecycle() {
    init_tracing();
    let config = CoreConfig::from_toml(
        r#"
        [memory]
        working_memory_slots = 7
        autobiographical_capacity = 100
        embedding_dim = 256
        semantic_max_items = 50
        "#,
    )
    .expect("config");
    let coordinator = MemoryCoordinator::new(&config);

    // A short conversation: each turn is perceived, remembered as text,
    // and committed as an experience.
    let turns = [
        "I finally finished the garden project we discussed",
        "It took months but the roses came out beautifully this season",
        "Thank you for remembering how much it mattered to me",
    ];
    for (i, turn) in turns.iter().enumerate() {
        let context = coordinator.perceive(PerceptualInput::from_user_text(*turn));
        assert!(context.load > 0.0);

        coordinator.remember_text(format!("turn-{i}"), *turn, BTreeMap::new());

        coordinator.commit_experience(
            Utc::now(),
            0.6,
            empathetic(0.85, 0.5),
            vec!["they shared something personal".to_string(); 6],
            direct(turn),
        );
    }

    // All three turns were significant enough to store.
    let status = coordinator.status();
    assert_eq!(status.episodic_memories, 3);
    assert_eq!(status.semantic_records, 3);
    assert_eq!(status.working.slots_used, 3);

    // Semantic recall surfaces the matching turn first.
    let hits = coordinator.recall_similar("the garden project", 3);
    assert_eq!(hits[0].id, "turn-0");

    // Episodic retrieval favors the empathetic memories just formed.
    let episodes = coordinator.retrieve_episodes(
        &RetrievalQuery {
            kind: Some(MemoryKind::EmpatheticConnection),
            primary_emotion: Some("warmth".to_string()),
        },
        2,
    );
    assert_eq!(episodes.len(), 2);

    // Identity has started accruing empathetic traits.
    let identity = coordinator.identity_summary();
    assert!(identity
        .dominant_traits
        .iter()
        .any(|(name, value)| name == "empathetic" && *value > 0.0));
    assert!(!identity.core_beliefs.is_empty());

    // Shutdown consolidates everything that survived the session.
    coordinator.shutdown();
    let episodes = coordinator.retrieve_episodes(
        &RetrievalQuery {
            kind: Some(MemoryKind::EmpatheticConnection),
            primary_emotion: None,
        },
        10,
    );
    assert!(episodes.iter().all(|m| (m.consolidation_level - 0.1).abs() < 1e-6));
}

// ---------------------------------------------------------------------------
// Working buffer recency contract
// ---------------------------------------------------------------------------

#[test]
fn twelve_inserts_into_seven_slots() {
    let mut buffer = WorkingBuffer::new(7);
    for i in 1..=12 {
        buffer.add(PerceptualInput::from_user_text(format!("item {i}")));
    }
    let resident: Vec<String> = buffer
        .items()
        .map(|item| item.content.user_input.clone().expect("text"))
        .collect();
    let expected: Vec<String> = (6..=12).map(|i| format!("item {i}")).collect();
    assert_eq!(resident, expected);
}

// ---------------------------------------------------------------------------
// Semantic index similarity contract
// ---------------------------------------------------------------------------

#[test]
fn hello_world_similarity_scenario() {
    let mut index = SemanticIndex::new(512, 100);
    index.add_memory("greeting", "hello world", BTreeMap::new());

    let exact = index.query("hello world", 1);
    assert!((exact[0].score - 1.0).abs() < 1e-6);

    let other = index.query("goodbye", 1);
    assert!(other[0].score < exact[0].score);
}

#[test]
fn semantic_index_is_fifo_bounded() {
    let mut index = SemanticIndex::new(128, 10);
    for i in 0..25 {
        index.add_memory(format!("m{i}"), format!("unique record text {i}"), BTreeMap::new());
    }
    assert_eq!(index.len(), 10);
    assert!(!index.contains("m0"));
    assert!(!index.contains("m14"));
    assert!(index.contains("m15"));
    assert!(index.contains("m24"));
}

// ---------------------------------------------------------------------------
// Episodic significance gate and capacity eviction
// ---------------------------------------------------------------------------

#[test]
fn empathetic_exchange_scenario() {
    let mut store = EpisodicStore::new(1000, 0.1);
    let user_text = "a".repeat(80);
    let memory = store
        .encode_experience(
            Utc::now(),
            0.7,
            EmotionalSnapshot {
                empathy_level: 0.9,
                primary_intensity: 0.8,
                ..EmotionalSnapshot::default()
            },
            (0..6).map(|i| format!("supportive thought {i}")).collect(),
            direct(&user_text),
        )
        .expect("stored");

    assert!(memory.significance >= 0.65, "got {}", memory.significance);
    assert!(memory.significance <= 1.0);
    assert_eq!(memory.kind, MemoryKind::EmpatheticConnection);
}

#[test]
fn capacity_overflow_evicts_and_never_resurfaces() {
    let mut store = EpisodicStore::new(20, 0.1);
    let mut stored_ids = Vec::new();

    for i in 0..40_u32 {
        let snapshot = EmotionalSnapshot {
            empathy_level: 0.3 + (i as f32 % 7.0) / 10.0,
            ..EmotionalSnapshot::default()
        };
        if let Some(memory) = store.encode_experience(
            Utc::now(),
            0.5,
            snapshot,
            (0..10).map(|t| format!("thought {t}")).collect(),
            ExperienceContext::default(),
        ) {
            stored_ids.push(memory.id);
        }
    }

    assert!(store.len() <= store.capacity());

    let evicted: Vec<_> = stored_ids
        .iter()
        .filter(|id| !store.contains(**id))
        .collect();
    assert!(!evicted.is_empty(), "40 inserts into capacity 20 must evict");

    // No evicted id can come back through retrieval, for any query kind.
    for kind in MemoryKind::ALL {
        let results = store.retrieve_memories(
            &RetrievalQuery {
                kind: Some(kind),
                primary_emotion: None,
            },
            100,
        );
        for result in results {
            assert!(
                !evicted.contains(&&result.id),
                "evicted memory {} resurfaced",
                result.id
            );
        }
    }

    // Every evicted memory left a completed summary behind.
    assert!(store.consolidated_summaries().count() > 0);
    for summary in store.consolidated_summaries() {
        assert!((summary.consolidation_level - 1.0).abs() < 1e-6);
    }
}

// ---------------------------------------------------------------------------
// Identity formation over a long session
// ---------------------------------------------------------------------------

#[test]
fn identity_grows_with_experience() {
    let mut store = EpisodicStore::new(1000, 0.1);

    // Early, shallow memories followed by deeper recent ones.
    for i in 0..24_u32 {
        let deepening = if i < 12 { 0.0 } else { 0.5 };
        store.encode_experience(
            Utc::now(),
            0.5,
            EmotionalSnapshot {
                empathy_level: 0.4 + deepening * 0.5,
                primary_intensity: 0.2 + deepening * 0.3,
                complexity: 0.2,
                ..EmotionalSnapshot::default()
            },
            (0..10).map(|t| format!("I learned more in round {t}")).collect(),
            ExperienceContext::default(),
        );
    }

    let summary = store.identity_summary();
    assert_eq!(summary.statistics.total_memories, 24);
    assert!(summary.statistics.average_significance > 0.3);
    assert!(summary.coherence > 0.0);
    assert!(!summary.core_beliefs.is_empty());
    // Learning vocabulary ran through every memory.
    assert!(summary
        .dominant_traits
        .iter()
        .any(|(name, _)| name == "learning_oriented" || name == "empathetic"));
}

// ---------------------------------------------------------------------------
// Config file → coordinator wiring
// ---------------------------------------------------------------------------

#[test]
fn coordinator_honors_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("reverie.toml");
    std::fs::write(
        &path,
        r#"
        [general]
        log_level = "debug"

        [memory]
        working_memory_slots = 2
        semantic_max_items = 3
        embedding_dim = 64
        "#,
    )
    .expect("write");

    let config = CoreConfig::from_file(&path).expect("load");
    let coordinator = MemoryCoordinator::new(&config);

    for i in 0..5 {
        coordinator.perceive(PerceptualInput::from_user_text(format!("turn {i}")));
        coordinator.remember_text(format!("m{i}"), format!("text {i}"), BTreeMap::new());
    }

    let status = coordinator.status();
    assert_eq!(status.working.slots_used, 2);
    assert_eq!(status.semantic_records, 3);
}
