use super::{Dependency, Version};
use serde::{Deserialize, Serialize};

/// Conventional archive path of the manifest document.
pub const MANIFEST_PATH: &str = "manifest.json";

/// Schema version written into every generated manifest.
pub const FORMAT_VERSION: u32 = 2;

/// Marker appended to the configured name in the manifest header.
pub const HEADER_SUFFIX: &str = " [BP]";

/// Module `type` of the data module.
pub const DATA_MODULE: &str = "data";

/// Module `type` of the script module.
pub const SCRIPT_MODULE: &str = "script";

/// Entry point declared by the script module.
pub const SCRIPT_ENTRY: &str = "scripts/main.js";

/// The pack's metadata header (`manifest.json`).
///
/// Field order matches the serialized document. Fields that hand-edited or
/// third-party manifests may omit are defaulted on read so that a partial
/// manifest can still seed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    pub header: ManifestHeader,
    #[serde(default)]
    pub modules: Vec<ManifestModule>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    #[serde(default)]
    pub metadata: ManifestMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub uuid: String,
    pub version: Version,
    pub min_engine_version: Version,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestModule {
    #[serde(rename = "type")]
    pub kind: String,
    pub uuid: String,
    pub version: Version,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManifestMetadata {
    #[serde(default)]
    pub authors: Vec<String>,
}

fn default_format_version() -> u32 {
    FORMAT_VERSION
}

impl Manifest {
    /// Serialize as two-space indented JSON.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Header name with a trailing [`HEADER_SUFFIX`] removed, if present.
    pub fn display_name(&self) -> &str {
        self.header
            .name
            .strip_suffix(HEADER_SUFFIX)
            .unwrap_or(&self.header.name)
    }

    /// First listed author, if any.
    pub fn primary_author(&self) -> Option<&str> {
        self.metadata
            .authors
            .first()
            .map(String::as_str)
            .filter(|author| !author.is_empty())
    }
}
