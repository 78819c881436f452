use super::{FileContent, FileSet, GeneratedTexture, ICON_PATH, MANIFEST_PATH, PackConfig, Version};
use crate::services::archive::{self, ArchiveError, ImportedPack, PackArchive};
use crate::services::generation::GenerationResponse;
use crate::services::manifest::generate_manifest;
use crate::services::reconcile::{self, MergeSummary};
use crate::services::token::TokenSource;

/// Path of the starter script in a new project.
pub const DEFAULT_SCRIPT_PATH: &str = "scripts/main.js";

/// Starter script placed in a new project.
pub const DEFAULT_SCRIPT: &str = r#"// Generated with Bedrock Pack Studio
import { world } from '@minecraft/server';

world.beforeEvents.chatSend.subscribe((eventData) => {
  const player = eventData.sender;
  if (eventData.message.toLowerCase() === 'hello') {
    player.sendMessage('Hello from your new pack!');
    eventData.cancel = true;
  }
});
"#;

/// Everything open in the studio.
///
/// Exactly one project is open at a time. The state is a value: each
/// operation below borrows the current state and returns the next one, and
/// the caller (usually [`crate::state::StateManager`]) swaps it in. Nothing
/// here mutates shared fields behind the caller's back.
///
/// `config` and `pack_icon` are working copies; [`save_configuration`]
/// folds them back into `files` as `manifest.json` and `pack_icon.png` so
/// that an export needs nothing but the file set.
///
/// [`save_configuration`]: ProjectState::save_configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectState {
    pub files: FileSet,
    pub config: PackConfig,
    pub pack_icon: Option<GeneratedTexture>,
    /// Generated textures other than the pack icon.
    pub textures: Vec<GeneratedTexture>,
    pub selected_file: Option<String>,
}

impl ProjectState {
    /// A fresh project: generated manifest plus the starter script.
    pub fn new(config: PackConfig, tokens: &mut dyn TokenSource) -> Result<Self, serde_json::Error> {
        let manifest = generate_manifest(&config, tokens);

        let mut files = FileSet::new();
        reconcile::upsert(&mut files, MANIFEST_PATH, FileContent::Text(manifest.to_pretty_json()?));
        reconcile::upsert(&mut files, DEFAULT_SCRIPT_PATH, FileContent::Text(DEFAULT_SCRIPT.to_string()));

        Ok(Self {
            files,
            config,
            pack_icon: None,
            textures: Vec::new(),
            selected_file: Some(DEFAULT_SCRIPT_PATH.to_string()),
        })
    }

    /// Replace the whole project with an imported archive.
    ///
    /// Selects the first script or JSON file, else the first file. Generated
    /// textures from the previous project are dropped.
    pub fn from_import(imported: ImportedPack) -> Self {
        let selected_file = imported
            .files
            .paths()
            .find(|path| path.ends_with(".js") || path.ends_with(".json"))
            .or_else(|| imported.files.first_path())
            .map(str::to_string);

        Self {
            files: imported.files,
            config: imported.config,
            pack_icon: imported.pack_icon,
            textures: Vec::new(),
            selected_file,
        }
    }

    /// Parse an archive and build the state it describes.
    ///
    /// The current project is untouched until this succeeds.
    pub async fn import(bytes: Vec<u8>, archive_name: &str) -> Result<Self, ArchiveError> {
        let imported = archive::parse_pack(bytes, archive_name).await?;
        Ok(Self::from_import(imported))
    }

    /// Fold configuration (and the icon, if any) into the file set.
    ///
    /// A freshly generated manifest replaces any `manifest.json`, including
    /// hand edits; the icon is upserted as binary at `pack_icon.png`.
    pub fn save_configuration(&self, tokens: &mut dyn TokenSource) -> Result<Self, serde_json::Error> {
        let manifest = generate_manifest(&self.config, tokens);
        let manifest_json = manifest.to_pretty_json()?;

        let mut next = self.track_pack_icon();
        reconcile::upsert(&mut next.files, MANIFEST_PATH, FileContent::Text(manifest_json));

        tracing::info!("Saved configuration for {:?} into the file list", self.config.name);
        Ok(next)
    }

    /// Upsert the current icon at `pack_icon.png`, leaving `manifest.json` alone.
    pub fn track_pack_icon(&self) -> Self {
        let mut next = self.clone();
        if let Some(icon) = &self.pack_icon {
            reconcile::upsert(&mut next.files, ICON_PATH, FileContent::Binary(icon.data.clone()));
        }
        next
    }

    /// Build the export archive from a freshly generated manifest.
    pub fn export(&self, tokens: &mut dyn TokenSource) -> Result<PackArchive, ArchiveError> {
        let manifest = generate_manifest(&self.config, tokens);
        archive::assemble_pack(&manifest, &self.files, &self.export_textures())
    }

    /// Icon first, then the other generated textures.
    pub fn export_textures(&self) -> Vec<GeneratedTexture> {
        self.pack_icon
            .iter()
            .chain(self.textures.iter())
            .cloned()
            .collect()
    }

    /// Fold a validated generation batch into the file set.
    ///
    /// Selection follows the batch: the first path mentioning `main.js`,
    /// otherwise the first path returned.
    pub fn apply_generation(&self, response: &GenerationResponse) -> (Self, MergeSummary) {
        let mut next = self.clone();
        let summary = reconcile::merge(&mut next.files, response.project_files());

        let focus = response
            .files
            .iter()
            .find(|file| file.path.contains("main.js"))
            .or_else(|| response.files.first());
        if let Some(file) = focus {
            next.selected_file = Some(file.path.clone());
        }

        (next, summary)
    }

    /// Replace the text of an existing file. Unknown paths are ignored.
    pub fn edit_file(&self, path: &str, text: &str) -> Self {
        let mut next = self.clone();
        match next.files.get_mut(path) {
            Some(content) => *content = FileContent::Text(text.to_string()),
            None => tracing::debug!("Ignoring edit of unknown file {}", path),
        }
        next
    }

    /// Delete a file; selection falls back to the first remaining file.
    pub fn remove_file(&self, path: &str) -> Self {
        let mut next = self.clone();
        if next.files.remove(path).is_some() && next.selected_file.as_deref() == Some(path) {
            next.selected_file = next.files.first_path().map(str::to_string);
        }
        next
    }

    /// Select an existing file. Unknown paths leave the selection alone.
    pub fn select_file(&self, path: &str) -> Self {
        let mut next = self.clone();
        if next.files.contains(path) {
            next.selected_file = Some(path.to_string());
        }
        next
    }

    pub fn selected_content(&self) -> Option<&FileContent> {
        self.selected_file
            .as_deref()
            .and_then(|path| self.files.get(path))
    }

    /// Apply an edit to the working configuration.
    pub fn with_config<F>(&self, edit: F) -> Self
    where
        F: FnOnce(&mut PackConfig),
    {
        let mut next = self.clone();
        edit(&mut next.config);
        next
    }

    /// Set the pack version from a display string such as `1.2.0`.
    pub fn set_version(&self, display: &str) -> Self {
        self.with_config(|config| config.version = Version::parse(display))
    }

    /// Set the minimum engine version from a display string.
    pub fn set_min_engine_version(&self, display: &str) -> Self {
        self.with_config(|config| config.min_engine_version = Version::parse(display))
    }

    pub fn set_pack_icon(&self, data: Vec<u8>) -> Self {
        let mut next = self.clone();
        next.pack_icon = Some(GeneratedTexture::pack_icon(data));
        next
    }

    pub fn clear_pack_icon(&self) -> Self {
        let mut next = self.clone();
        next.pack_icon = None;
        next
    }

    /// Track a generated texture; one named `pack_icon` becomes the icon,
    /// others replace an earlier texture of the same name.
    pub fn add_texture(&self, texture: GeneratedTexture) -> Self {
        if texture.is_pack_icon() {
            return self.set_pack_icon(texture.data);
        }
        let mut next = self.clone();
        match next.textures.iter_mut().find(|t| t.name == texture.name) {
            Some(existing) => *existing = texture,
            None => next.textures.push(texture),
        }
        next
    }
}
