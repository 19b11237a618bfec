//! Integration tests for the generation log.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use fragment_store::{
    ErrorKind, FragmentDraft, FragmentStore, GenerationEventDraft, GenerationLog, InMemoryLock,
    Lock, StoreConfig,
};
use tempfile::TempDir;

fn temp_log() -> (TempDir, GenerationLog) {
    let dir = TempDir::new().unwrap();
    let log = GenerationLog::open(&StoreConfig::new(dir.path()));
    (dir, log)
}

#[test]
fn appends_keep_their_order() {
    let (dir, log) = temp_log();

    let first = log
        .append(GenerationEventDraft::new("first").prefix("pre-1"))
        .unwrap();
    let second = log
        .append(
            GenerationEventDraft::new("second")
                .refined("Second, refined.")
                .suffix("suf-1")
                .phase_prompt("3", "p3_0123abcd"),
        )
        .unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(log.list_all().unwrap(), vec![first.clone(), second.clone()]);
    assert!(dir.path().join("prompt_history.json").is_file());

    // Earlier events are untouched by later appends
    assert_eq!(log.get(&first.id).unwrap(), Some(first));
    assert_eq!(second.phase_number.as_deref(), Some("3"));
    assert_eq!(second.ai_refined_text.as_deref(), Some("Second, refined."));
}

#[test]
fn history_document_uses_the_documented_field_names() {
    let (dir, log) = temp_log();
    log.append(GenerationEventDraft::new("hello").prefix("a").prefix("b"))
        .unwrap();

    let bytes = std::fs::read(dir.path().join("prompt_history.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let event = &doc[0];
    assert!(event["id"].as_str().unwrap().starts_with("hist_"));
    assert!(event["timestamp"].is_string());
    assert_eq!(event["user_text"], "hello");
    assert_eq!(event["prefix_ids"], serde_json::json!(["a", "b"]));
    assert_eq!(event["suffix_ids"], serde_json::json!([]));
}

#[test]
fn blank_user_text_is_still_recorded() {
    let (_dir, log) = temp_log();
    let event = log
        .append(GenerationEventDraft::new(" \n").suffix("suf-1"))
        .unwrap();

    assert_eq!(event.user_text, " \n");
    assert_eq!(log.list_all().unwrap(), vec![event]);
}

#[test]
fn unreadable_log_is_a_storage_failure() {
    let (_dir, log) = temp_log();
    std::fs::create_dir_all(log.path()).unwrap();

    let err = log.append(GenerationEventDraft::new("text")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageFailure);
}

#[test]
fn concurrent_appends_lose_nothing() {
    const WRITERS: usize = 20;
    let (_dir, log) = temp_log();

    thread::scope(|s| {
        for n in 0..WRITERS {
            let log = &log;
            s.spawn(move || {
                log.append(GenerationEventDraft::new(format!("prompt {n}")))
                    .unwrap();
            });
        }
    });

    let events = log.list_all().unwrap();
    assert_eq!(events.len(), WRITERS);
    let ids: BTreeSet<_> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids.len(), WRITERS);
    assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn log_and_fragments_do_not_block_each_other() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig::new(dir.path());
    let store = FragmentStore::open(config.clone()).unwrap();

    // Hold the log's own lock while fragments are written
    let log_lock = Arc::new(InMemoryLock::new());
    let log = GenerationLog::with_lock(config.history_path(), Arc::clone(&log_lock));
    let guard = log_lock.acquire().unwrap();

    thread::scope(|s| {
        let handle = s.spawn(|| store.create("prefixes", FragmentDraft::new("unblocked")));
        assert!(handle.join().unwrap().is_ok());
    });

    drop(guard);
    assert!(log.append(GenerationEventDraft::new("after")).is_ok());
}

#[test]
fn recent_is_the_newest_tail() {
    let (_dir, log) = temp_log();
    for n in 0..5 {
        log.append(GenerationEventDraft::new(format!("prompt {n}")))
            .unwrap();
    }

    let recent: Vec<_> = log
        .recent(2)
        .unwrap()
        .into_iter()
        .map(|e| e.user_text)
        .collect();
    assert_eq!(recent, vec!["prompt 3", "prompt 4"]);
    assert!(log.recent(0).unwrap().is_empty());
}
