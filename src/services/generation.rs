use crate::models::{GeneratedTexture, ProjectFile, TextureError};
use serde::Deserialize;
use thiserror::Error;

/// Errors interpreting what the generation provider returned
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation response was not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Generation response has the wrong shape: {0}")]
    InvalidShape(#[source] serde_json::Error),

    #[error("No image was generated")]
    EmptyImage,

    #[error("Generated image could not be decoded: {0}")]
    InvalidImage(#[from] TextureError),
}

/// One file proposed by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// A validated generation batch.
///
/// Only constructed through [`parse_generation_response`], so holding one
/// means the whole batch had the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub files: Vec<GeneratedFile>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl GenerationResponse {
    /// Files of the batch as text project files, in response order.
    pub fn project_files(&self) -> Vec<ProjectFile> {
        self.files
            .iter()
            .map(|file| ProjectFile::text(file.path.clone(), file.content.clone()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Interpret the provider's raw response text.
///
/// The text must be a JSON object whose optional `files` member is an array
/// of `{path, content}` string pairs. Nothing about the file contents is
/// checked. Failures leave the caller with nothing to apply.
pub fn parse_generation_response(text: &str) -> Result<GenerationResponse, GenerationError> {
    let value: serde_json::Value =
        serde_json::from_str(text.trim()).map_err(GenerationError::InvalidJson)?;
    let response: GenerationResponse =
        serde_json::from_value(value).map_err(GenerationError::InvalidShape)?;

    tracing::debug!(
        "Generation response carries {} files (explanation: {})",
        response.files.len(),
        response.explanation.is_some()
    );

    Ok(response)
}

/// Turn the provider's base64 image payload into the pack icon texture.
pub fn pack_icon_from_payload(payload: &str) -> Result<GeneratedTexture, GenerationError> {
    if payload.trim().is_empty() {
        return Err(GenerationError::EmptyImage);
    }
    let texture = GeneratedTexture::from_base64(crate::models::ICON_TEXTURE_NAME, payload)?;
    Ok(texture)
}
