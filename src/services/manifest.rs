use super::TokenSource;
use crate::models::manifest::{
    DATA_MODULE, FORMAT_VERSION, HEADER_SUFFIX, SCRIPT_ENTRY, SCRIPT_MODULE,
};
use crate::models::{Manifest, ManifestHeader, ManifestMetadata, ManifestModule, PackConfig};

/// Derive a manifest from configuration.
///
/// Draws three fresh tokens from `tokens` on every call, so two manifests
/// generated from equal configuration differ in their identities. The header
/// name always receives the ` [BP]` suffix, even when the configured name
/// already ends with it.
pub fn generate_manifest(config: &PackConfig, tokens: &mut dyn TokenSource) -> Manifest {
    let header_uuid = tokens.next_token();
    let data_uuid = tokens.next_token();
    let script_uuid = tokens.next_token();

    tracing::debug!("Generating manifest for pack {:?}", config.name);

    Manifest {
        format_version: FORMAT_VERSION,
        header: ManifestHeader {
            name: format!("{}{}", config.name, HEADER_SUFFIX),
            description: config.description.clone(),
            uuid: header_uuid,
            version: config.version,
            min_engine_version: config.min_engine_version,
        },
        modules: vec![
            ManifestModule {
                kind: DATA_MODULE.to_string(),
                uuid: data_uuid,
                version: config.version,
                entry: None,
            },
            ManifestModule {
                kind: SCRIPT_MODULE.to_string(),
                uuid: script_uuid,
                version: config.version,
                entry: Some(SCRIPT_ENTRY.to_string()),
            },
        ],
        dependencies: config.dependencies.clone(),
        metadata: ManifestMetadata {
            authors: vec![config.author.clone()],
        },
    }
}

/// Recover configuration from a manifest document's text.
///
/// Returns `None` when the text is not a readable manifest; the caller
/// decides on a fallback.
pub fn derive_config(manifest_text: &str) -> Option<PackConfig> {
    let manifest = match Manifest::from_json(manifest_text) {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::warn!("Failed to parse manifest: {}", e);
            return None;
        }
    };

    Some(PackConfig {
        name: manifest.display_name().to_string(),
        description: manifest.header.description.clone(),
        author: manifest
            .primary_author()
            .unwrap_or(crate::models::config::UNKNOWN_AUTHOR)
            .to_string(),
        version: manifest.header.version,
        min_engine_version: manifest.header.min_engine_version,
        dependencies: manifest.dependencies,
    })
}
