use super::Version;
use serde::{Deserialize, Serialize};

/// A dependency declared by the pack, copied verbatim into the manifest.
///
/// Names are not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub module_name: String,
    pub version: String,
}

impl Dependency {
    pub fn new(module_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            version: version.into(),
        }
    }
}

/// Which half of a [`Dependency`] an index-addressed edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyField {
    ModuleName,
    Version,
}

/// User-editable pack identity.
///
/// The manifest is always derived from this, never edited through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackConfig {
    pub name: String,
    pub description: String,
    pub author: String,
    pub version: Version,
    pub min_engine_version: Version,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

/// Author recorded when a manifest does not name one.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Description given to packs imported without a usable manifest.
pub const IMPORTED_DESCRIPTION: &str = "Imported project";

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            name: "My Awesome Pack".to_string(),
            description: "A new pack created with Bedrock Pack Studio.".to_string(),
            author: "Player".to_string(),
            version: Version::new(1, 0, 0),
            min_engine_version: Version::new(1, 21, 0),
            dependencies: vec![
                Dependency::new("@minecraft/server", "2.4.0-beta"),
                Dependency::new("@minecraft/server-ui", "2.1.0-beta"),
            ],
        }
    }
}

impl PackConfig {
    /// Configuration synthesized for an archive that carries no usable manifest.
    pub fn fallback(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: IMPORTED_DESCRIPTION.to_string(),
            author: UNKNOWN_AUTHOR.to_string(),
            version: Version::new(1, 0, 0),
            min_engine_version: Version::new(1, 21, 0),
            dependencies: Vec::new(),
        }
    }

    /// Append an empty dependency row for the user to fill in.
    pub fn add_dependency(&mut self) {
        self.dependencies.push(Dependency::new("", ""));
    }

    /// Edit one field of the dependency at `index`.
    ///
    /// Returns false if the index is out of range.
    pub fn update_dependency(&mut self, index: usize, field: DependencyField, value: &str) -> bool {
        let Some(dependency) = self.dependencies.get_mut(index) else {
            return false;
        };
        match field {
            DependencyField::ModuleName => dependency.module_name = value.to_string(),
            DependencyField::Version => dependency.version = value.to_string(),
        }
        true
    }

    /// Remove the dependency at `index`, if any.
    pub fn remove_dependency(&mut self, index: usize) -> Option<Dependency> {
        if index < self.dependencies.len() {
            Some(self.dependencies.remove(index))
        } else {
            None
        }
    }
}

/// Studio settings from `Studio Settings.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioSettings {
    #[serde(rename = "Default Pack", default)]
    pub default_pack: PackConfig,

    #[serde(rename = "Logging", default)]
    pub logging: LoggingSettings,

    #[serde(rename = "Export Directory", default = "default_export_dir")]
    pub export_dir: String,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            default_pack: PackConfig::default(),
            logging: LoggingSettings::default(),
            export_dir: default_export_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(rename = "Log Directory", default = "default_log_dir")]
    pub log_dir: String,

    #[serde(rename = "Log Prefix", default = "default_log_prefix")]
    pub log_prefix: String,

    #[serde(rename = "Debug Mode", default)]
    pub debug_mode: bool,

    #[serde(rename = "Console Output", default = "default_console_output")]
    pub console_output: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            log_prefix: default_log_prefix(),
            debug_mode: false,
            console_output: default_console_output(),
        }
    }
}

fn default_export_dir() -> String {
    ".".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_prefix() -> String {
    "packstudio".to_string()
}

fn default_console_output() -> bool {
    true
}
