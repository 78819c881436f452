//! Services module - the pack assembly/disassembly engine.
//!
//! Everything here is framework-agnostic: no editor, no network. Inputs are
//! explicit parameters and results are plain values, so the state layer and
//! the command line drive the same code.
//!
//! # Components
//!
//! - [`manifest`]: derives a [`Manifest`](crate::models::Manifest) from
//!   [`PackConfig`](crate::models::PackConfig) and recovers configuration from
//!   manifest text
//! - [`token`]: the [`TokenSource`] capability that mints manifest identities
//! - [`classify`]: extension-based binary/text classification
//! - [`archive`]: packs a file set into an `.mcpack` archive and parses one
//!   back, decoding entries concurrently on tokio blocking tasks
//! - [`reconcile`]: upsert-by-path merging of new files into a file set
//! - [`generation`]: validation of generation provider responses
//! - [`file_tree`]: folder/file tree for listing a project
//! - [`workspace`]: project directories on disk
//!
//! # Precedence
//!
//! Whenever the same logical file can come from two places, the file set
//! wins: a `manifest.json` or `pack_icon.png` already tracked by the project
//! is exported as-is, not replaced by the freshly generated manifest or the
//! transient icon texture.

pub mod archive;
pub mod classify;
pub mod file_tree;
pub mod generation;
pub mod manifest;
pub mod reconcile;
pub mod token;
pub mod workspace;

pub use archive::{ArchiveError, ImportedPack, PackArchive, assemble_pack, parse_pack, read_pack};
pub use classify::is_binary;
pub use file_tree::{FileNode, build_tree};
pub use generation::{GenerationError, GenerationResponse, parse_generation_response};
pub use manifest::{derive_config, generate_manifest};
pub use reconcile::{MergeSummary, UpsertOutcome, merge, upsert};
pub use token::{SequentialTokenSource, TokenSource, UuidTokenSource};
pub use workspace::{load_project_dir, open_project_dir, project_config, write_project_dir};
