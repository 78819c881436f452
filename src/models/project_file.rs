use base64::Engine as _;
use indexmap::IndexMap;
use thiserror::Error;

/// Conventional archive path of the pack icon.
pub const ICON_PATH: &str = "pack_icon.png";

/// Logical name of the generated texture that becomes the pack icon.
pub const ICON_TEXTURE_NAME: &str = "pack_icon";

/// Directory that non-icon generated textures are filed under.
pub const TEXTURES_DIR: &str = "textures";

/// Payload of a project file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    Binary(Vec<u8>),
}

impl FileContent {
    pub fn is_binary(&self) -> bool {
        matches!(self, FileContent::Binary(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FileContent::Text(text) => Some(text),
            FileContent::Binary(_) => None,
        }
    }

    /// Raw bytes as they are stored in an archive.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FileContent::Text(text) => text.as_bytes(),
            FileContent::Binary(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Text shown to an editor: literal text, or base64 for binary payloads.
    pub fn to_display_string(&self) -> String {
        match self {
            FileContent::Text(text) => text.clone(),
            FileContent::Binary(bytes) => base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }
}

impl From<String> for FileContent {
    fn from(text: String) -> Self {
        FileContent::Text(text)
    }
}

impl From<&str> for FileContent {
    fn from(text: &str) -> Self {
        FileContent::Text(text.to_string())
    }
}

impl From<Vec<u8>> for FileContent {
    fn from(bytes: Vec<u8>) -> Self {
        FileContent::Binary(bytes)
    }
}

/// One path-addressed unit of the open project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    pub path: String,
    pub content: FileContent,
}

impl ProjectFile {
    pub fn new(path: impl Into<String>, content: impl Into<FileContent>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn text(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(path, FileContent::Text(text.into()))
    }

    pub fn binary(path: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(path, FileContent::Binary(bytes))
    }
}

/// The project's files keyed by relative path.
///
/// Insertion order is preserved. Inserting at an existing path replaces the
/// content in place; the reconciler in [`crate::services::reconcile`] is the
/// intended way to add files.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileSet {
    entries: IndexMap<String, FileContent>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<&FileContent> {
        self.entries.get(path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut FileContent> {
        self.entries.get_mut(path)
    }

    /// Position of `path` in insertion order.
    pub fn position(&self, path: &str) -> Option<usize> {
        self.entries.get_index_of(path)
    }

    /// Insert or replace, returning the previous content if the path existed.
    pub(crate) fn insert(&mut self, path: String, content: FileContent) -> Option<FileContent> {
        self.entries.insert(path, content)
    }

    /// Remove a file, keeping the order of the remaining entries.
    pub fn remove(&mut self, path: &str) -> Option<FileContent> {
        self.entries.shift_remove(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileContent)> {
        self.entries.iter().map(|(path, content)| (path.as_str(), content))
    }

    pub fn first_path(&self) -> Option<&str> {
        self.entries.keys().next().map(String::as_str)
    }

    /// Clone the entries out as [`ProjectFile`] values.
    pub fn to_files(&self) -> Vec<ProjectFile> {
        self.iter()
            .map(|(path, content)| ProjectFile::new(path, content.clone()))
            .collect()
    }
}

/// Collecting applies files in order; a later file replaces an earlier one
/// at the same path.
impl FromIterator<ProjectFile> for FileSet {
    fn from_iter<I: IntoIterator<Item = ProjectFile>>(iter: I) -> Self {
        let mut files = FileSet::new();
        for file in iter {
            files.insert(file.path, file.content);
        }
        files
    }
}

/// Errors decoding a generated image payload
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Texture name must not be empty")]
    EmptyName,

    #[error("Texture payload is not valid base64: {0}")]
    InvalidPayload(#[from] base64::DecodeError),
}

/// An image produced by the generation provider, not yet part of the file set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTexture {
    pub name: String,
    pub data: Vec<u8>,
}

impl GeneratedTexture {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Result<Self, TextureError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TextureError::EmptyName);
        }
        Ok(Self { name, data })
    }

    /// Decode the provider's base64 image payload.
    pub fn from_base64(name: impl Into<String>, payload: &str) -> Result<Self, TextureError> {
        let data = base64::engine::general_purpose::STANDARD.decode(payload.trim())?;
        Self::new(name, data)
    }

    /// Wrap a payload as the distinguished pack icon.
    pub fn pack_icon(data: Vec<u8>) -> Self {
        Self {
            name: ICON_TEXTURE_NAME.to_string(),
            data,
        }
    }

    pub fn is_pack_icon(&self) -> bool {
        self.name == ICON_TEXTURE_NAME
    }

    /// Archive path this texture is filed under.
    pub fn archive_path(&self) -> String {
        if self.is_pack_icon() {
            ICON_PATH.to_string()
        } else {
            format!("{}/{}.png", TEXTURES_DIR, self.name)
        }
    }
}
