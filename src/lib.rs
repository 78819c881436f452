// Pack Studio - assemble and disassemble Bedrock behavior pack archives
//
// This is the library crate containing the pack engine and project state.
// The binary crate (main.rs) provides the command line entry point.

pub mod config;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use models::{
    FileContent, FileSet, GeneratedTexture, Manifest, PackConfig, ProjectFile, ProjectState,
    StudioSettings, Version,
};
pub use state::{StateChange, StateManager};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
