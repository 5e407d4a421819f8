use anyhow::{Context, Result};
use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::errors::PersistenceError;

// @module: File and directory utilities

/// Which files the extractor looks at
#[derive(Debug, Clone)]
pub struct SourceFilter {
    /// Extensions to keep, with or without the leading dot
    pub allowed_extensions: Vec<String>,
    /// Directory names that are never descended into
    pub ignored_dirs: Vec<String>,
}

impl SourceFilter {
    /// Create a filter from extension and directory lists
    pub fn new(allowed_extensions: Vec<String>, ignored_dirs: Vec<String>) -> Self {
        Self {
            allowed_extensions,
            ignored_dirs,
        }
    }

    /// Whether the file's extension is one of the allowed ones
    pub fn accepts_file(&self, path: &Path) -> bool {
        let Some(ext) = path.extension() else {
            return false;
        };
        let ext = ext.to_string_lossy();
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.') == ext)
    }

    /// Whether a directory with this name is skipped entirely
    pub fn ignores_dir(&self, name: &str) -> bool {
        self.ignored_dirs.iter().any(|ignored| ignored == name)
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    /// Find source files under `dir` in file-name order, honoring the filter
    pub fn find_source_files<P: AsRef<Path>>(dir: P, filter: &SourceFilter) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let root = dir.as_ref();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                // Never prune the root itself
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !filter.ignores_dir(&entry.file_name().to_string_lossy())
            });

        for entry in walker {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if entry.file_type().is_file() && filter.accepts_file(path) {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Path of `path` relative to `base`, with `/` separators, for use as a label
    pub fn relative_label<P1: AsRef<Path>, P2: AsRef<Path>>(path: P1, base: P2) -> String {
        let path = path.as_ref();
        Self::path_label(path.strip_prefix(base.as_ref()).unwrap_or(path))
    }

    /// `path` with `/` separators and without `.` components
    pub fn path_label<P: AsRef<Path>>(path: P) -> String {
        path.as_ref()
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .map(|c| match c {
                // Joined with `/` below, so an empty root keeps a single leading slash
                Component::RootDir => Cow::Borrowed(""),
                other => other.as_os_str().to_string_lossy(),
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Read a file into memory
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        fs::read(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write to a sibling temporary file, sync it, then rename it over `path`.
    ///
    /// Readers see either the previous complete file or the new one.
    pub fn write_atomically(path: &Path, data: &[u8]) -> Result<(), PersistenceError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| PersistenceError::io(dir, e))?;

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| PersistenceError::io(dir, e))?;
        temp.write_all(data)
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| PersistenceError::io(temp.path(), e))?;
        temp.persist(path)
            .map_err(|e| PersistenceError::io(path, e.error))?;

        Ok(())
    }
}
