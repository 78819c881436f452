// State management module
//
// This module provides the StateManager which holds the open ProjectState
// behind Arc<RwLock<T>>, swaps in the next state value after every
// operation, and emits change events for the presentation layer.

use crate::models::{GeneratedTexture, PackConfig, ProjectState};
use crate::services::archive::{self, ArchiveError, PackArchive};
use crate::services::generation::{self, GenerationError};
use crate::services::reconcile::MergeSummary;
use crate::services::token::{TokenSource, UuidTokenSource};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::sync::broadcast;

/// Change events emitted when the open project is replaced by a new state
///
/// These events are emitted to notify interested parties (an editor, a CLI
/// progress display) about changes without requiring them to poll.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// Files were added, replaced, edited or removed
    FilesChanged { file_count: usize },

    /// The working configuration was edited
    ConfigurationChanged,

    /// A different file (or none) is selected
    SelectionChanged { path: Option<String> },

    /// The pack icon texture was set, replaced or cleared
    PackIconChanged { present: bool },

    /// Generated (non-icon) textures changed
    TexturesChanged { count: usize },

    /// The whole project was replaced by an import
    ProjectReplaced { file_count: usize },
}

/// Outcome of folding a generation response into the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub summary: MergeSummary,
    pub explanation: Option<String>,
}

/// Thread-safe holder of the single open project
///
/// This is the one mutual-exclusion boundary around the file set:
/// - Operations are pure functions `&ProjectState -> ProjectState` applied
///   under the write lock; the result replaces the previous value
/// - Fallible operations leave the state untouched when they fail
/// - Change events are derived by comparing old and new state and broadcast
///   on a tokio channel
/// - Manifest identities come from the injected [`TokenSource`]
pub struct StateManager {
    /// The open project, replaced wholesale on every transition
    state: Arc<RwLock<ProjectState>>,

    /// Identity tokens for generated manifests
    tokens: Mutex<Box<dyn TokenSource>>,

    /// Broadcast channel for emitting state change events
    state_tx: broadcast::Sender<StateChange>,
}

impl StateManager {
    /// Create a StateManager around an initial project
    ///
    /// # Returns
    /// A new StateManager with a broadcast channel buffer of 100 events
    pub fn new(initial: ProjectState, tokens: Box<dyn TokenSource>) -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(initial)),
            tokens: Mutex::new(tokens),
            state_tx,
        }
    }

    /// Open a new project from `config` with random manifest identities
    pub fn with_new_project(config: PackConfig) -> Result<Self, serde_json::Error> {
        let mut tokens: Box<dyn TokenSource> = Box::new(UuidTokenSource);
        let initial = ProjectState::new(config, &mut *tokens)?;
        Ok(Self::new(initial, tokens))
    }

    /// Get a clone of the current state
    pub fn snapshot(&self) -> ProjectState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Execute a function with read access to the state
    ///
    /// # Example
    /// ```ignore
    /// let count = state_manager.read(|state| state.files.len());
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ProjectState) -> R,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Replace the state with the result of `transition` and emit events
    ///
    /// # Returns
    /// The StateChange events that were emitted
    pub fn update<F>(&self, transition: F) -> Vec<StateChange>
    where
        F: FnOnce(&ProjectState) -> ProjectState,
    {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let next = transition(&state);
        let changes = detect_changes(&state, &next);
        *state = next;
        drop(state);

        self.emit(&changes);
        changes
    }

    /// Like [`update`](Self::update) for operations that can fail
    ///
    /// On error the current state is kept and no events are emitted.
    pub fn try_update<F, E>(&self, transition: F) -> Result<Vec<StateChange>, E>
    where
        F: FnOnce(&ProjectState) -> Result<ProjectState, E>,
    {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let next = transition(&state)?;
        let changes = detect_changes(&state, &next);
        *state = next;
        drop(state);

        self.emit(&changes);
        Ok(changes)
    }

    /// Subscribe to state change events
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    fn emit(&self, changes: &[StateChange]) {
        for change in changes {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.state_tx.send(change.clone());
        }
    }

    fn with_tokens<R>(&self, f: impl FnOnce(&mut dyn TokenSource) -> R) -> R {
        let mut tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut **tokens)
    }

    // Convenience methods for the core project operations

    /// Fold configuration and icon into the file set
    pub fn save_configuration(&self) -> Result<Vec<StateChange>, serde_json::Error> {
        self.with_tokens(|tokens| self.try_update(|state| state.save_configuration(tokens)))
    }

    /// Build the export archive from the current state
    ///
    /// The project is not changed, whether or not assembly succeeds.
    pub fn export(&self) -> Result<PackArchive, ArchiveError> {
        let state = self.snapshot();
        self.with_tokens(|tokens| state.export(tokens))
    }

    /// Parse an archive and, only if that succeeds, replace the project
    pub async fn import_archive(
        &self,
        bytes: Vec<u8>,
        archive_name: &str,
    ) -> Result<Vec<StateChange>, ArchiveError> {
        let imported = archive::parse_pack(bytes, archive_name).await?;
        let next = ProjectState::from_import(imported);
        let file_count = next.files.len();

        let mut changes = self.update(|_| next);

        let replaced = StateChange::ProjectReplaced { file_count };
        self.emit(std::slice::from_ref(&replaced));
        changes.push(replaced);

        Ok(changes)
    }

    /// Validate a provider response and fold its files in
    ///
    /// A response that fails validation changes nothing.
    pub fn apply_generation_response(&self, text: &str) -> Result<GenerationOutcome, GenerationError> {
        let response = generation::parse_generation_response(text)?;

        let mut summary = MergeSummary::default();
        self.update(|state| {
            let (next, merged) = state.apply_generation(&response);
            summary = merged;
            next
        });

        Ok(GenerationOutcome {
            summary,
            explanation: response.explanation,
        })
    }

    /// Decode the provider's image payload and make it the pack icon
    pub fn set_pack_icon_from_payload(&self, payload: &str) -> Result<Vec<StateChange>, GenerationError> {
        let icon = generation::pack_icon_from_payload(payload)?;
        Ok(self.update(|state| state.set_pack_icon(icon.data)))
    }

    /// Write the current icon into the file set without regenerating the manifest
    pub fn track_pack_icon(&self) -> Vec<StateChange> {
        self.update(ProjectState::track_pack_icon)
    }

    pub fn add_texture(&self, texture: GeneratedTexture) -> Vec<StateChange> {
        self.update(|state| state.add_texture(texture))
    }

    pub fn edit_file(&self, path: &str, text: &str) -> Vec<StateChange> {
        self.update(|state| state.edit_file(path, text))
    }

    pub fn remove_file(&self, path: &str) -> Vec<StateChange> {
        self.update(|state| state.remove_file(path))
    }

    pub fn select_file(&self, path: &str) -> Vec<StateChange> {
        self.update(|state| state.select_file(path))
    }

    /// Edit the working configuration
    pub fn update_config<F>(&self, edit: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut PackConfig),
    {
        self.update(|state| state.with_config(edit))
    }
}

/// Detect what changed between two states and generate events
fn detect_changes(old: &ProjectState, new: &ProjectState) -> Vec<StateChange> {
    let mut changes = Vec::new();

    if !same_files(old, new) {
        changes.push(StateChange::FilesChanged {
            file_count: new.files.len(),
        });
    }

    if old.config != new.config {
        changes.push(StateChange::ConfigurationChanged);
    }

    if old.selected_file != new.selected_file {
        changes.push(StateChange::SelectionChanged {
            path: new.selected_file.clone(),
        });
    }

    if old.pack_icon != new.pack_icon {
        changes.push(StateChange::PackIconChanged {
            present: new.pack_icon.is_some(),
        });
    }

    if old.textures != new.textures {
        changes.push(StateChange::TexturesChanged {
            count: new.textures.len(),
        });
    }

    changes
}

/// Equal content and equal order.
fn same_files(old: &ProjectState, new: &ProjectState) -> bool {
    old.files.len() == new.files.len()
        && old
            .files
            .iter()
            .zip(new.files.iter())
            .all(|(a, b)| a == b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileContent, MANIFEST_PATH};
    use crate::services::token::SequentialTokenSource;

    fn manager() -> StateManager {
        let mut tokens = SequentialTokenSource::new();
        let initial = ProjectState::new(PackConfig::default(), &mut tokens).unwrap();
        StateManager::new(initial, Box::new(tokens))
    }

    #[test]
    fn test_update_emits_file_and_selection_events() {
        let manager = manager();
        let changes = manager.remove_file("scripts/main.js");

        assert_eq!(
            changes,
            vec![
                StateChange::FilesChanged { file_count: 1 },
                StateChange::SelectionChanged {
                    path: Some(MANIFEST_PATH.to_string())
                },
            ]
        );
    }

    #[test]
    fn test_noop_emits_nothing() {
        let manager = manager();
        assert!(manager.edit_file("missing.js", "x").is_empty());
        assert!(manager.select_file("missing.js").is_empty());
    }

    #[test]
    fn test_failed_generation_leaves_state() {
        let manager = manager();
        let before = manager.snapshot();

        let result = manager.apply_generation_response("{\"files\": [{\"path\": 1}]}");

        assert!(result.is_err());
        assert_eq!(manager.snapshot(), before);
    }

    #[test]
    fn test_save_configuration_uses_injected_tokens() {
        let manager = manager();
        manager.update_config(|config| config.name = "Tokens".to_string());
        manager.save_configuration().unwrap();

        let text = manager.read(|state| {
            state
                .files
                .get(MANIFEST_PATH)
                .and_then(FileContent::as_text)
                .map(str::to_string)
        });
        let text = text.unwrap();
        // tokens 1-3 went to the initial manifest
        assert!(text.contains("00000000-0000-0000-0000-000000000004"));
        assert!(text.contains("Tokens [BP]"));
    }

    #[test]
    fn test_icon_tracked_without_touching_manifest() {
        let manager = manager();
        manager.edit_file(MANIFEST_PATH, "{ \"format_version\": 2 }");
        manager.set_pack_icon_from_payload("AAEC").unwrap();

        let changes = manager.track_pack_icon();

        assert_eq!(changes, vec![StateChange::FilesChanged { file_count: 3 }]);
        manager.read(|state| {
            assert_eq!(
                state.files.get(MANIFEST_PATH).and_then(FileContent::as_text),
                Some("{ \"format_version\": 2 }")
            );
            assert_eq!(state.files.get("pack_icon.png"), Some(&FileContent::Binary(vec![0, 1, 2])));
        });
    }

    #[tokio::test]
    async fn test_import_broadcasts_project_replaced() {
        let source = manager();
        let bytes = source.export().unwrap().bytes;
        let target = manager();
        let mut rx = target.subscribe();

        target.import_archive(bytes, "copy.mcpack").await.unwrap();

        let mut received = Vec::new();
        while let Ok(change) = rx.try_recv() {
            received.push(change);
        }
        assert!(matches!(received.last(), Some(StateChange::ProjectReplaced { .. })));
    }

    #[test]
    fn test_reordering_counts_as_file_change() {
        let manager = manager();
        let changes = manager.update(|state| {
            let mut next = state.clone();
            let files = next.files.to_files();
            next.files = files.into_iter().rev().collect();
            next
        });
        assert_eq!(changes, vec![StateChange::FilesChanged { file_count: 2 }]);
    }
}
