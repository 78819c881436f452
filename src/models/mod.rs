//! Data models for Pack Studio.
//!
//! - [`PackConfig`]: user-editable pack identity (name, author, versions, dependencies)
//! - [`Manifest`]: the derived `manifest.json` document
//! - [`Version`]: three-component versions and their display-string codec
//! - [`FileSet`] / [`ProjectFile`] / [`FileContent`]: the open project's files
//! - [`GeneratedTexture`]: images from the generation provider, including the pack icon
//! - [`ProjectState`]: everything open in the studio, advanced one operation at a time
//! - [`StudioSettings`]: settings loaded from `Studio Settings.yaml`

pub mod config;
pub mod manifest;
pub mod project_file;
pub mod project_state;
pub mod version;

pub use config::{Dependency, DependencyField, LoggingSettings, PackConfig, StudioSettings};
pub use manifest::{MANIFEST_PATH, Manifest, ManifestHeader, ManifestMetadata, ManifestModule};
pub use project_file::{
    FileContent, FileSet, GeneratedTexture, ICON_PATH, ICON_TEXTURE_NAME, ProjectFile,
    TEXTURES_DIR, TextureError,
};
pub use project_state::{DEFAULT_SCRIPT, DEFAULT_SCRIPT_PATH, ProjectState};
pub use version::Version;
