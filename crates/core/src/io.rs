//! Shared font I/O utilities.

use std::{
    fs::{create_dir_all, read, remove_file, write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::{Pattern, glob};
use glyph_container::FontContainer;

#[derive(Debug, Clone)]
pub struct FontFile {
    path: PathBuf,
}

impl FontFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<Vec<u8>> {
        read(&self.path).with_context(|| format!("Failed to read font: {}", self.path.display()))
    }

    pub fn write(&self, data: impl AsRef<[u8]>) -> Result<()> {
        write(&self.path, data)
            .with_context(|| format!("Failed to write font: {}", self.path.display()))
    }

    pub fn transform(&self, f: impl FnOnce(&[u8]) -> Result<Vec<u8>>) -> Result<()> {
        let data = self.read()?;
        let new_data = f(&data)?;
        self.write(new_data)
    }

    /// Load the font into an editable container.
    pub fn open(&self) -> Result<FontContainer> {
        FontContainer::open(&self.path)
            .with_context(|| format!("Failed to open font: {}", self.path.display()))
    }

    pub fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }
        Ok(())
    }
}

impl AsRef<Path> for FontFile {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Files in `dir` matching a glob pattern, sorted.
///
/// `dir` and `literal` are matched verbatim and `wildcard` is a glob suffix,
/// so names taken from configuration cannot inject glob syntax.
pub fn glob_fonts(dir: &Path, literal: &str, wildcard: &str) -> Result<Vec<PathBuf>> {
    let dir_str = dir.to_str().context("Invalid pattern path")?;
    let pattern = Path::new(&Pattern::escape(dir_str))
        .join(format!("{}{wildcard}", Pattern::escape(literal)));
    let pattern_str = pattern.to_str().context("Invalid pattern path")?;
    let mut paths: Vec<PathBuf> = glob(pattern_str)
        .with_context(|| format!("Failed to glob pattern: {pattern_str}"))?
        .filter_map(Result::ok)
        .collect();
    paths.sort();
    Ok(paths)
}

/// Delete every file in `dir` whose name starts with `prefix`.
pub fn remove_with_prefix(dir: &Path, prefix: &str) -> Result<usize> {
    let files = glob_fonts(dir, prefix, "*")?;
    for file in &files {
        remove_file(file).with_context(|| format!("Failed to remove {}", file.display()))?;
    }
    Ok(files.len())
}
