//! Integration tests for StateManager with state change events
//!
//! These tests verify that the StateManager correctly:
//! - Emits state change events when an operation changes the project
//! - Supports multiple subscribers
//! - Handles concurrent access from multiple threads
//! - Leaves the project untouched when an operation fails

use packstudio::models::{FileContent, GeneratedTexture, MANIFEST_PATH, PackConfig, ProjectState};
use packstudio::services::SequentialTokenSource;
use packstudio::{StateChange, StateManager};
use std::sync::Arc;
use std::thread;
use tokio::time::{Duration, timeout};

fn manager() -> StateManager {
    let mut tokens = SequentialTokenSource::new();
    let initial = ProjectState::new(PackConfig::default(), &mut tokens).unwrap();
    StateManager::new(initial, Box::new(tokens))
}

#[tokio::test]
async fn test_state_change_events_emitted() {
    let state = manager();
    let mut rx = state.subscribe();

    state.update_config(|config| config.name = "Renamed".to_string());

    let event = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout waiting for event")
        .expect("Channel closed");

    assert_eq!(event, StateChange::ConfigurationChanged);
}

#[tokio::test]
async fn test_multiple_subscribers_receive_events() {
    let state = manager();
    let mut rx1 = state.subscribe();
    let mut rx2 = state.subscribe();

    state.add_texture(GeneratedTexture::new("sword", vec![1]).unwrap());

    for rx in [&mut rx1, &mut rx2] {
        let event = timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("Timeout waiting for event")
            .expect("Channel closed");
        assert_eq!(event, StateChange::TexturesChanged { count: 1 });
    }
}

#[tokio::test]
async fn test_generation_selects_main_script() {
    let state = manager();
    state.select_file(MANIFEST_PATH);
    let mut rx = state.subscribe();

    let outcome = state
        .apply_generation_response(
            r#"{"files": [
                {"path": "scripts/util.js", "content": "export {}"},
                {"path": "scripts/main.js", "content": "import './util.js';"}
            ], "explanation": "Split helpers out"}"#,
        )
        .unwrap();

    assert_eq!(outcome.summary.inserted, 1);
    assert_eq!(outcome.summary.replaced, 1);
    assert_eq!(outcome.explanation.as_deref(), Some("Split helpers out"));

    let files_event = rx.recv().await.unwrap();
    assert_eq!(files_event, StateChange::FilesChanged { file_count: 3 });
    let selection_event = rx.recv().await.unwrap();
    assert_eq!(
        selection_event,
        StateChange::SelectionChanged {
            path: Some("scripts/main.js".to_string())
        }
    );

    let snapshot = state.snapshot();
    assert_eq!(
        snapshot.files.paths().collect::<Vec<_>>(),
        vec![MANIFEST_PATH, "scripts/main.js", "scripts/util.js"]
    );
}

#[tokio::test]
async fn test_import_replaces_project() {
    let source = manager();
    source.update_config(|config| config.name = "Shared".to_string());
    source.save_configuration().unwrap();
    let bytes = source.export().unwrap().bytes;

    let target = manager();
    target.add_texture(GeneratedTexture::new("stale", vec![0]).unwrap());
    let mut rx = target.subscribe();

    let changes = target.import_archive(bytes, "shared.mcpack").await.unwrap();

    assert_eq!(changes.last(), Some(&StateChange::ProjectReplaced { file_count: 2 }));
    let snapshot = target.snapshot();
    assert_eq!(snapshot.config.name, "Shared");
    assert!(snapshot.textures.is_empty());
    assert_eq!(snapshot.selected_file.as_deref(), Some(MANIFEST_PATH));

    let mut received = Vec::new();
    while let Ok(change) = rx.try_recv() {
        received.push(change);
    }
    assert_eq!(received, changes);
}

#[tokio::test]
async fn test_failed_import_leaves_project() {
    let state = manager();
    let before = state.snapshot();

    let result = state.import_archive(b"garbage".to_vec(), "garbage.mcpack").await;

    assert!(result.is_err());
    assert_eq!(state.snapshot(), before);
}

#[test]
fn test_icon_payload_saved_into_files() {
    let state = manager();

    let changes = state.set_pack_icon_from_payload("AAEC").unwrap();
    assert_eq!(changes, vec![StateChange::PackIconChanged { present: true }]);

    state.save_configuration().unwrap();
    assert_eq!(
        state.read(|s| s.files.get("pack_icon.png").cloned()),
        Some(FileContent::Binary(vec![0, 1, 2]))
    );
}

#[test]
fn test_invalid_icon_payload_changes_nothing() {
    let state = manager();
    assert!(state.set_pack_icon_from_payload("").is_err());
    assert!(state.set_pack_icon_from_payload("***").is_err());
    assert!(state.read(|s| s.pack_icon.is_none()));
}

#[test]
fn test_concurrent_edits() {
    let state = Arc::new(manager());
    let mut handles = Vec::new();

    for i in 0..8 {
        let state = Arc::clone(&state);
        handles.push(thread::spawn(move || {
            let path = format!("scripts/worker_{}.js", i);
            state.update(|s| {
                let mut next = s.clone();
                packstudio::services::upsert(&mut next.files, path.clone(), FileContent::Text(String::new()));
                next
            });
            state.edit_file(&path, &format!("// worker {}", i));
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = state.snapshot();
    assert_eq!(snapshot.files.len(), 10);
    for i in 0..8 {
        let path = format!("scripts/worker_{}.js", i);
        let expected = format!("// worker {}", i);
        assert_eq!(
            snapshot.files.get(&path).and_then(FileContent::as_text),
            Some(expected.as_str())
        );
    }
}

#[test]
fn test_import_from_blocking_context() {
    let source = manager();
    let bytes = source.export().unwrap().bytes;
    let target = manager();

    tokio_test::block_on(async {
        target.import_archive(bytes, "blocking.mcpack").await.unwrap();
    });

    assert_eq!(target.read(|s| s.config.name.clone()), "My Awesome Pack");
}
