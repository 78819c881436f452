use super::classify::is_binary;
use super::manifest::derive_config;
use super::reconcile;
use crate::models::{
    FileContent, FileSet, GeneratedTexture, ICON_PATH, MANIFEST_PATH, Manifest, PackConfig,
};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use regex::Regex;
use std::io::{Cursor, Read, Write};
use std::sync::{Arc, LazyLock};
use thiserror::Error;
use tokio::task::JoinSet;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Extension given to exported archives.
pub const ARCHIVE_EXTENSION: &str = "mcpack";

/// Largest uncompressed entry an import will decode.
pub const MAX_ENTRY_SIZE: u64 = 256 * 1024 * 1024;

/// Cap on the buffer reserved up front from an entry's declared size.
const ENTRY_PREALLOC_CAP: u64 = 1024 * 1024;

static UNSAFE_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]").expect("Invalid file name regex"));

static ARCHIVE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(mcpack|zip)$").expect("Invalid archive suffix regex"));

/// Errors that can occur while packing or unpacking an archive
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Not a valid pack archive: {0}")]
    InvalidContainer(#[source] zip::result::ZipError),

    #[error("Failed to write archive entry {path}: {reason}")]
    EntryWrite { path: String, reason: String },

    #[error("Failed to read archive entry {path}: {reason}")]
    EntryRead { path: String, reason: String },

    #[error("Failed to serialize manifest: {0}")]
    ManifestSerialization(#[from] serde_json::Error),

    #[error("Entry decoding task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A finished archive, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackArchive {
    /// Suggested file name, derived from the manifest header name.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PackArchive {
    /// Write the archive into `dir` under its suggested file name.
    pub async fn write_to(&self, dir: &Utf8Path) -> Result<Utf8PathBuf, ArchiveError> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        tracing::info!("Wrote {} ({} bytes)", path, self.bytes.len());
        Ok(path)
    }
}

/// Everything recovered from an imported archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedPack {
    pub files: FileSet,
    pub config: PackConfig,
    pub pack_icon: Option<GeneratedTexture>,
    /// False when configuration was synthesized from the archive name.
    pub config_from_manifest: bool,
}

/// Suggested archive file name: every character outside `[A-Za-z0-9]` of the
/// header name becomes `_`, the result is lower-cased.
pub fn archive_file_name(manifest: &Manifest) -> String {
    let stem = UNSAFE_NAME_CHARS.replace_all(&manifest.header.name, "_");
    format!("{}.{}", stem.to_lowercase(), ARCHIVE_EXTENSION)
}

/// Archive file name with a trailing `.mcpack` or `.zip` removed.
pub fn archive_stem(archive_name: &str) -> String {
    ARCHIVE_SUFFIX.replace(archive_name, "").into_owned()
}

/// Serialize a manifest, the project files and generated textures into a
/// single compressed archive.
///
/// Files already present in `files` take precedence: the manifest is only
/// written when `manifest.json` is absent, and a texture is skipped when the
/// file set already tracks its target path. Among textures, the first one
/// named `pack_icon` is filed at `pack_icon.png`; other textures go to
/// `textures/<name>.png`, a later texture replacing an earlier one of the
/// same name. Any failed entry aborts the whole assembly.
pub fn assemble_pack(
    manifest: &Manifest,
    files: &FileSet,
    textures: &[GeneratedTexture],
) -> Result<PackArchive, ArchiveError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    if files.contains(MANIFEST_PATH) {
        tracing::debug!("Using manifest.json from the file set");
    } else {
        let json = manifest.to_pretty_json()?;
        write_entry(&mut writer, MANIFEST_PATH, json.as_bytes(), options)?;
    }

    for (path, content) in files.iter() {
        write_entry(&mut writer, path, content.as_bytes(), options)?;
    }

    let mut texture_entries: IndexMap<String, &[u8]> = IndexMap::new();
    for texture in textures {
        let path = texture.archive_path();
        if files.contains(&path) {
            tracing::debug!("Skipping texture {}: {} is tracked in the file set", texture.name, path);
            continue;
        }
        if texture.is_pack_icon() {
            texture_entries.entry(path).or_insert(&texture.data);
        } else {
            texture_entries.insert(path, &texture.data);
        }
    }
    for (path, data) in &texture_entries {
        write_entry(&mut writer, path, data, options)?;
    }

    let cursor = writer.finish().map_err(|e| ArchiveError::EntryWrite {
        path: "<central directory>".to_string(),
        reason: e.to_string(),
    })?;
    let bytes = cursor.into_inner();

    let file_name = archive_file_name(manifest);
    tracing::info!(
        "Assembled {} with {} project files and {} textures ({} bytes)",
        file_name,
        files.len(),
        texture_entries.len(),
        bytes.len()
    );

    Ok(PackArchive { file_name, bytes })
}

fn write_entry<W: Write + std::io::Seek>(
    writer: &mut ZipWriter<W>,
    path: &str,
    data: &[u8],
    options: SimpleFileOptions,
) -> Result<(), ArchiveError> {
    writer
        .start_file(path, options)
        .map_err(|e| ArchiveError::EntryWrite {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
    writer.write_all(data).map_err(|e| ArchiveError::EntryWrite {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

/// One decoded, non-directory entry.
#[derive(Debug)]
struct DecodedEntry {
    index: usize,
    path: String,
    content: FileContent,
}

/// Deserialize an archive into a file set, configuration and optional icon.
///
/// Each entry is decompressed on its own blocking task over a shared copy of
/// the archive; all tasks are awaited before anything is returned, and the
/// result is assembled in archive order regardless of completion order.
///
/// Configuration comes from `manifest.json` when it parses; otherwise it is
/// synthesized from `archive_name` with its extension stripped. A malformed
/// manifest is still kept as a text file. Only a broken container or an
/// unreadable entry fails the import.
pub async fn parse_pack(bytes: Vec<u8>, archive_name: &str) -> Result<ImportedPack, ArchiveError> {
    let data: Arc<[u8]> = Arc::from(bytes);
    let archive = ZipArchive::new(Cursor::new(data)).map_err(ArchiveError::InvalidContainer)?;
    let entry_count = archive.len();

    tracing::debug!("Decoding {} archive entries from {}", entry_count, archive_name);

    let mut tasks = JoinSet::new();
    for index in 0..entry_count {
        let mut archive = archive.clone();
        tasks.spawn_blocking(move || decode_entry(&mut archive, index, MAX_ENTRY_SIZE));
    }

    let mut decoded = Vec::with_capacity(entry_count);
    while let Some(joined) = tasks.join_next().await {
        if let Some(entry) = joined?? {
            decoded.push(entry);
        }
    }
    decoded.sort_by_key(|entry| entry.index);

    let mut files = FileSet::new();
    let mut config = None;
    let mut pack_icon = None;

    for entry in decoded {
        if entry.path == MANIFEST_PATH {
            if let Some(text) = entry.content.as_text() {
                config = derive_config(text);
            }
        } else if entry.path == ICON_PATH {
            pack_icon = Some(GeneratedTexture::pack_icon(entry.content.as_bytes().to_vec()));
        }
        reconcile::upsert(&mut files, entry.path, entry.content);
    }

    let config_from_manifest = config.is_some();
    let config = config.unwrap_or_else(|| {
        tracing::warn!("No usable manifest in {}, using fallback configuration", archive_name);
        PackConfig::fallback(archive_stem(archive_name))
    });

    tracing::info!(
        "Imported {} files from {} (icon: {})",
        files.len(),
        archive_name,
        pack_icon.is_some()
    );

    Ok(ImportedPack {
        files,
        config,
        pack_icon,
        config_from_manifest,
    })
}

/// Read an archive from disk and parse it, naming it after its file name.
pub async fn read_pack(path: &Utf8Path) -> Result<ImportedPack, ArchiveError> {
    let bytes = tokio::fs::read(path).await?;
    let archive_name = path.file_name().unwrap_or(path.as_str());
    parse_pack(bytes, archive_name).await
}

/// Decompress one entry, refusing anything larger than `limit` bytes
/// whether the size is declared up front or only shows up while reading.
fn decode_entry<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    index: usize,
    limit: u64,
) -> Result<Option<DecodedEntry>, ArchiveError> {
    let mut file = archive
        .by_index(index)
        .map_err(|e| ArchiveError::EntryRead {
            path: format!("#{}", index),
            reason: e.to_string(),
        })?;

    if file.is_dir() {
        return Ok(None);
    }

    let path = file.name().to_string();
    let declared = file.size();
    if declared > limit {
        return Err(ArchiveError::EntryRead {
            path,
            reason: format!("declared size {} exceeds the {} byte limit", declared, limit),
        });
    }

    let mut raw = Vec::with_capacity(declared.min(ENTRY_PREALLOC_CAP) as usize);
    (&mut file)
        .take(limit + 1)
        .read_to_end(&mut raw)
        .map_err(|e| ArchiveError::EntryRead {
            path: path.clone(),
            reason: e.to_string(),
        })?;
    if raw.len() as u64 > limit {
        return Err(ArchiveError::EntryRead {
            path,
            reason: format!("entry exceeds the {} byte limit", limit),
        });
    }

    let binary = path != MANIFEST_PATH && (path == ICON_PATH || is_binary(&path));
    let content = if binary {
        FileContent::Binary(raw)
    } else {
        FileContent::Text(decode_text(&path, raw))
    };

    Ok(Some(DecodedEntry {
        index,
        path,
        content,
    }))
}

fn decode_text(path: &str, raw: Vec<u8>) -> String {
    match String::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("{} is not valid UTF-8, replacing invalid sequences", path);
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}
