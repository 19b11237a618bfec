//! Integration tests for the assembled library: configuration, phases and
//! prompt composition.

use fragment_store::{assemble, ErrorKind, FragmentDraft, Library, PromptSelection, StoreConfig};
use tempfile::TempDir;

const PHASES: &str = r#"[
    {"id": "1", "name": "Discovery", "description": "Understand the problem"},
    {"id": "2", "name": "Design", "description": "Shape the solution"}
]"#;

fn temp_library() -> (TempDir, Library) {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("phases.json"), PHASES).unwrap();
    let library = Library::open(StoreConfig::new(dir.path())).unwrap();
    (dir, library)
}

#[test]
fn assembler_drops_blank_parts() {
    assert_eq!(assemble("  P  ", "", "M", "  "), "P\n\nM");
    assert_eq!(assemble("", "", "", ""), "");
    assert_eq!(assemble("", "phase", "", "S"), "phase\n\nS");
}

#[test]
fn open_loads_the_phase_catalog() {
    let (_dir, library) = temp_library();
    let ids: Vec<_> = library.phases().ids().collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(library.phases().require("2").unwrap().name, "Design");
}

#[test]
fn compose_records_what_it_assembled() {
    let (_dir, library) = temp_library();
    let fragments = library.fragments();
    let prefix = fragments
        .create("prefixes", FragmentDraft::new("  You are an expert.  "))
        .unwrap();
    let phase = fragments
        .create("phase/1", FragmentDraft::new("List open questions."))
        .unwrap();

    let selection = PromptSelection::new("Plan a CLI tool")
        .prefix(&prefix.id)
        .phase("1", &phase.id);
    let composed = library.compose(&selection).unwrap();

    assert_eq!(
        composed.text,
        "You are an expert.\n\nList open questions.\n\nPlan a CLI tool"
    );
    let event = composed.event.unwrap();
    assert_eq!(event.user_text, "Plan a CLI tool");
    assert_eq!(event.prefix_ids, vec![prefix.id]);
    assert!(event.suffix_ids.is_empty());
    assert_eq!(event.phase_prompt_id, Some(phase.id));
    assert_eq!(library.generations().list_all().unwrap(), vec![event]);
}

#[test]
fn prompts_without_main_text_are_still_recorded() {
    let (_dir, library) = temp_library();
    let prefix = library
        .fragments()
        .create("prefixes", FragmentDraft::new("You are terse."))
        .unwrap();

    // Fragments only
    let composed = library
        .compose(&PromptSelection::new("").prefix(&prefix.id))
        .unwrap();
    assert_eq!(composed.text, "You are terse.");
    let event = composed.event.unwrap();
    assert_eq!(event.user_text, "");
    assert_eq!(event.prefix_ids, vec![prefix.id]);

    // Refined text over a blank original
    let composed = library
        .compose(&PromptSelection::new(" ").refined("Refined text"))
        .unwrap();
    assert_eq!(composed.text, "Refined text");
    assert_eq!(
        composed.event.unwrap().ai_refined_text.as_deref(),
        Some("Refined text")
    );

    assert_eq!(library.generations().list_all().unwrap().len(), 2);
}

#[test]
fn unconfigured_phase_is_rejected() {
    let (dir, library) = temp_library();

    let selection = PromptSelection::new("text").phase("9", "p9_00000000");
    let err = library.compose(&selection).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(err.to_string().contains("1, 2"), "{err}");
    assert!(!dir.path().join("prompt_history.json").exists());
}

#[test]
fn failed_log_append_does_not_fail_the_prompt() {
    let (dir, library) = temp_library();
    let suffix = library
        .fragments()
        .create("suffixes", FragmentDraft::new("Reply in JSON."))
        .unwrap();

    // A directory where the log document should be makes every append fail
    std::fs::create_dir_all(dir.path().join("prompt_history.json")).unwrap();

    let selection = PromptSelection::new("List three colors").suffix(&suffix.id);
    let composed = library.compose(&selection).unwrap();

    assert_eq!(composed.text, "List three colors\n\nReply in JSON.");
    assert!(composed.event.is_none());
}

#[test]
fn missing_phase_document_means_no_phases() {
    let dir = TempDir::new().unwrap();
    let library = Library::open(StoreConfig::new(dir.path())).unwrap();

    assert!(library.phases().is_empty());
    assert!(!dir.path().join("phases.json").exists());
}

#[test]
fn config_file_points_at_the_data_directory() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("prompts");
    let config_path = dir.path().join("store.json");
    std::fs::write(
        &config_path,
        serde_json::json!({ "data_dir": data_dir, "history_file": "audit.json" }).to_string(),
    )
    .unwrap();

    let library = Library::open(StoreConfig::from_file(&config_path).unwrap()).unwrap();
    library
        .compose(&PromptSelection::new("hello"))
        .unwrap()
        .event
        .unwrap();

    assert!(data_dir.join("audit.json").is_file());
}
