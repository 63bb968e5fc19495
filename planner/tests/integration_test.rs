//! Integration tests for the content planner library
//!
//! These exercise the session store, deduplication and autosave together
//! through the public API.

use std::sync::Arc;
use std::time::Duration;

use contentplanner::autosave::AutosaveScheduler;
use contentplanner::session::{ContentIdea, SessionStore};
use tempfile::TempDir;

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_round_trip_reproduces_session() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("nested/dir/content_ideas.json");

    let store = SessionStore::new(&path);
    store.set_product("Wireless Headphones");
    store.add_qa_round(&["Q1", "Q2"], &["A1", "A2"]).unwrap();
    store.add_qa_round(&["Q3"], &["A3"]).unwrap();
    store.add_content_ideas(vec![
        ContentIdea::new("How to Use Wireless Headphones for Running", "guide"),
        ContentIdea::new("Best Wireless Headphones for Gaming", "roundup"),
    ]);
    assert!(store.save());

    let restored = SessionStore::new(&path);
    assert!(restored.load());
    assert_eq!(restored.product_name(), store.product_name());
    assert_eq!(restored.round_count(), 2);
    assert_eq!(restored.qa_context(), store.qa_context());
    assert_eq!(restored.content_ideas(), store.content_ideas());

    let rounds: Vec<u32> = restored.qa_context().iter().map(|r| r.round).collect();
    assert_eq!(rounds, vec![1, 1, 2]);
}

#[test]
fn test_legacy_file_is_upgraded_on_save() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("legacy.json");
    std::fs::write(
        &path,
        r#"{"product_name": "Buds", "content_ideas": ["Old Idea", {"title": "New Idea", "summary": "s"}]}"#,
    )
    .unwrap();

    let store = SessionStore::new(&path);
    assert!(store.load());
    assert_eq!(store.round_count(), 0);
    assert_eq!(
        store.content_ideas(),
        vec![ContentIdea::new("Old Idea", ""), ContentIdea::new("New Idea", "s")]
    );

    assert!(store.save());
    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["content_ideas"][0]["title"], "Old Idea");
    assert_eq!(raw["content_ideas"][0]["summary"], "");
    assert_eq!(raw["rounds"], 0);
    assert!(raw["last_updated"].is_string());
}

#[test]
fn test_dedup_rules_through_store() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = SessionStore::new(temp_dir.path().join("s.json"));

    store.add_content_ideas(vec![ContentIdea::new("How To Use X", "a")]);
    store.add_content_ideas(vec![ContentIdea::new("how to use x", "b")]);
    assert_eq!(store.content_ideas().len(), 1);

    store.add_content_ideas(vec![ContentIdea::new("How to Use Wireless Headphones for Running", "")]);
    store.add_content_ideas(vec![ContentIdea::new("How to use wireless headphones while running", "")]);
    assert_eq!(store.content_ideas().len(), 2);

    store.add_content_ideas(vec![ContentIdea::new("Best Wireless Headphones for Gaming", "")]);
    assert_eq!(store.content_ideas().len(), 3);

    store.add_content_ideas(vec![ContentIdea::new("Buy Now", ""), ContentIdea::new("Buy Soon", "")]);
    assert_eq!(store.content_ideas().len(), 5);
}

// =============================================================================
// Autosave
// =============================================================================

#[tokio::test]
async fn test_autosave_persists_while_foreground_mutates() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("autosave.json");
    let store = Arc::new(SessionStore::new(&path));
    store.set_product("Buds");

    let mut autosave = AutosaveScheduler::new();
    let save_store = Arc::clone(&store);
    assert!(autosave.start(Duration::from_millis(50), Arc::new(move || save_store.save())));

    for i in 0..5 {
        store
            .add_qa_round(&[format!("Question {}", i)], &[format!("Answer {}", i)])
            .unwrap();
    }

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(autosave.stop(Duration::from_secs(1)).await);
    assert!(store.last_saved().is_some());

    let summary = SessionStore::new(&path).session_summary().expect("autosave wrote the file");
    assert_eq!(summary.product_name, "Buds");
    assert_eq!(summary.rounds, 5);
    assert_eq!(summary.qa_count, 5);
}
