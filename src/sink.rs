//! Artifact sinks
//!
//! The extractor only ever talks to storage through [`ArtifactSink`]. Both
//! operations are blocking; writes are full overwrites of UTF-8 text.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StorageError;

/// Directory-backed storage for named text artifacts
pub trait ArtifactSink {
    /// Create `path` and any missing parents. A no-op if it already exists.
    fn ensure_directory(&mut self, path: &Path) -> Result<(), StorageError>;

    /// Write `content` to `path`, replacing anything already there
    fn write_file(&mut self, path: &Path, content: &str) -> Result<(), StorageError>;
}

/// Sink backed by the real file system
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectorySink;

impl DirectorySink {
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactSink for DirectorySink {
    fn ensure_directory(&mut self, path: &Path) -> Result<(), StorageError> {
        fs::create_dir_all(path).map_err(|e| StorageError::new(path, e))
    }

    fn write_file(&mut self, path: &Path, content: &str) -> Result<(), StorageError> {
        debug!("Writing {} bytes to {}", content.len(), path.display());
        fs::write(path, content).map_err(|e| StorageError::new(path, e))
    }
}

/// In-memory sink for dry runs and tests
///
/// Keeps the final content per path plus the order writes happened in.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    directories: Vec<PathBuf>,
    files: BTreeMap<PathBuf, String>,
    write_log: Vec<PathBuf>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    pub fn files(&self) -> &BTreeMap<PathBuf, String> {
        &self.files
    }

    pub fn get(&self, path: &Path) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Every write in the order it happened, including overwrites
    pub fn write_log(&self) -> &[PathBuf] {
        &self.write_log
    }
}

impl ArtifactSink for MemorySink {
    fn ensure_directory(&mut self, path: &Path) -> Result<(), StorageError> {
        if !self.directories.iter().any(|dir| dir == path) {
            self.directories.push(path.to_path_buf());
        }
        Ok(())
    }

    fn write_file(&mut self, path: &Path, content: &str) -> Result<(), StorageError> {
        self.files.insert(path.to_path_buf(), content.to_string());
        self.write_log.push(path.to_path_buf());
        Ok(())
    }
}
