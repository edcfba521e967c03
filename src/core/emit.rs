//! Per-file JSON catalogs.
//!
//! A file's descriptors are written to
//! `<messagesDir>/<source dir relative to cwd>/<file stem>.json`, sorted by
//! case-insensitive id.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::core::data::MessageDescriptor;
use crate::core::transform::FileContext;

pub struct CatalogEmitter<'a> {
    messages_dir: Option<&'a str>,
}

impl<'a> CatalogEmitter<'a> {
    pub fn new(messages_dir: Option<&'a str>) -> Self {
        Self { messages_dir }
    }

    /// Write the catalog for `file`. Nothing is written when no output
    /// directory is configured or there are no messages.
    pub fn emit(&self, file: &FileContext, messages: &[MessageDescriptor]) -> Result<Option<PathBuf>> {
        let Some(messages_dir) = self.messages_dir else {
            return Ok(None);
        };
        if messages.is_empty() {
            return Ok(None);
        }

        let path = catalog_path(Path::new(messages_dir), &file.path, &file.cwd);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = render_catalog(messages)?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write catalog: {}", path.display()))?;
        Ok(Some(path))
    }
}

/// Mirror `source`'s directory (relative to `cwd`) under `messages_dir`.
pub fn catalog_path(messages_dir: &Path, source: &Path, cwd: &Path) -> PathBuf {
    let relative = source.strip_prefix(cwd).unwrap_or(source);
    let mut path = messages_dir.to_path_buf();
    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            if let Component::Normal(segment) = component {
                path.push(segment);
            }
        }
    }
    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.push(format!("{stem}.json"));
    path
}

/// Sorted, 2-space pretty-printed JSON array with a trailing newline.
pub fn render_catalog(messages: &[MessageDescriptor]) -> Result<String> {
    let mut sorted = messages.to_vec();
    sorted.sort_by_key(|m| m.id.to_lowercase());
    let mut content =
        serde_json::to_string_pretty(&sorted).context("Failed to serialize message catalog")?;
    content.push('\n');
    Ok(content)
}
