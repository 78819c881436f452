use super::archive::ImportedPack;
use super::classify::is_binary;
use super::manifest::derive_config;
use super::reconcile;
use crate::models::{
    FileContent, FileSet, GeneratedTexture, ICON_PATH, MANIFEST_PATH, PackConfig, ProjectState,
};
use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Load every file under `dir` into a file set.
///
/// Paths are relative to `dir` and always `/`-separated. Binary-classified
/// files are read as bytes; everything else as UTF-8 text with invalid
/// sequences replaced. Entries are sorted by path so loading is repeatable.
pub fn load_project_dir(dir: &Utf8Path) -> Result<FileSet> {
    if !dir.is_dir() {
        bail!("Project directory not found: {}", dir);
    }

    let mut relative_paths = Vec::new();
    collect_files(dir, dir, &mut relative_paths)?;
    relative_paths.sort();

    let mut files = FileSet::new();
    for relative in relative_paths {
        let full_path = dir.join(&relative);
        let bytes =
            fs::read(&full_path).with_context(|| format!("Failed to read {}", full_path))?;
        let content = if is_binary(&relative) {
            FileContent::Binary(bytes)
        } else {
            FileContent::Text(String::from_utf8_lossy(&bytes).into_owned())
        };
        reconcile::upsert(&mut files, relative, content);
    }

    tracing::info!("Loaded {} files from {}", files.len(), dir);
    Ok(files)
}

fn collect_files(root: &Utf8Path, dir: &Utf8Path, out: &mut Vec<String>) -> Result<()> {
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir))?;
        let path = Utf8PathBuf::try_from(entry.path())
            .with_context(|| format!("Non UTF-8 path under {}", dir))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("Failed to stat {}", path))?;

        if file_type.is_dir() {
            collect_files(root, &path, out)?;
        } else if file_type.is_file() {
            let relative = path
                .strip_prefix(root)
                .with_context(|| format!("{} escaped {}", path, root))?;
            let components: Vec<&str> = relative.components().map(|c| c.as_str()).collect();
            out.push(components.join("/"));
        }
    }

    Ok(())
}

/// Write a file set below `dir`, creating parent directories as needed.
///
/// Paths that would escape `dir` are rejected before anything is written.
pub fn write_project_dir(dir: &Utf8Path, files: &FileSet) -> Result<()> {
    for path in files.paths() {
        let relative = Utf8Path::new(path);
        if relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, camino::Utf8Component::ParentDir))
        {
            bail!("Refusing to write outside the project directory: {}", path);
        }
    }

    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir))?;

    for (path, content) in files.iter() {
        let target = dir.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent))?;
        }
        fs::write(&target, content.as_bytes())
            .with_context(|| format!("Failed to write {}", target))?;
    }

    tracing::info!("Wrote {} files to {}", files.len(), dir);
    Ok(())
}

/// Configuration for a project directory: from its `manifest.json` when
/// readable, otherwise a fallback named after the directory.
pub fn project_config(dir: &Utf8Path, files: &FileSet) -> PackConfig {
    files
        .get(MANIFEST_PATH)
        .and_then(FileContent::as_text)
        .and_then(derive_config)
        .unwrap_or_else(|| PackConfig::fallback(dir.file_name().unwrap_or("pack")))
}

/// Open a project directory the way an imported archive is opened:
/// configuration from `manifest.json`, icon from `pack_icon.png`.
pub fn open_project_dir(dir: &Utf8Path) -> Result<ProjectState> {
    let files = load_project_dir(dir)?;
    let config_from_manifest = files
        .get(MANIFEST_PATH)
        .and_then(FileContent::as_text)
        .is_some_and(|text| derive_config(text).is_some());
    let config = project_config(dir, &files);
    let pack_icon = match files.get(ICON_PATH) {
        Some(FileContent::Binary(bytes)) => Some(GeneratedTexture::pack_icon(bytes.clone())),
        _ => None,
    };

    Ok(ProjectState::from_import(ImportedPack {
        files,
        config,
        pack_icon,
        config_from_manifest,
    }))
}
