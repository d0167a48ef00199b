// Migration core utilities
//
// Common helpers shared by the extraction and normalization paths.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Path conversion utilities (stems, artifact file names)
pub mod paths;

/// File utilities
pub mod file_utils {
    use super::*;
    use std::fs;

    /// Check if a file has a script-family extension the parser understands
    pub fn is_supported_file(path: &Path) -> bool {
        crate::language::ScriptLanguage::from_path(path).is_some()
    }

    /// Read file content safely
    pub fn read_file_content(path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))
    }

    /// Expand a command-line input into concrete file paths
    ///
    /// Inputs containing glob metacharacters are expanded (sorted, script files only);
    /// anything else is taken literally so a missing file still surfaces as a
    /// read error instead of silently matching nothing.
    pub fn expand_input(input: &str) -> Result<Vec<PathBuf>> {
        if !input.contains(['*', '?', '[']) {
            return Ok(vec![PathBuf::from(input)]);
        }

        let mut paths = Vec::new();
        for entry in
            glob::glob(input).with_context(|| format!("Invalid glob pattern '{}'", input))?
        {
            let path = entry.with_context(|| format!("Unreadable match for '{}'", input))?;
            if path.is_file() && is_supported_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}
