//! Source units: one input file's path and text

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::language::ScriptLanguage;
use crate::utils::{file_utils, paths};

/// An identifying path and its source text. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    path: PathBuf,
    text: String,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Read a source unit from disk
    pub fn read(path: &Path) -> Result<Self> {
        let text = file_utils::read_file_content(path)?;
        Ok(Self::new(path, text))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// File name with its script extension stripped (`src/sample.js` -> `sample`)
    pub fn stem(&self) -> String {
        paths::source_stem(&self.path)
    }

    pub fn language(&self) -> Option<ScriptLanguage> {
        ScriptLanguage::from_path(&self.path)
    }

    /// Identifier recorded on declarations derived from this unit
    pub fn identifier(&self) -> String {
        path_identifier(&self.path)
    }
}

/// Forward-slashed path used to identify a source unit in declarations and errors
pub fn path_identifier(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_stem_and_language() {
        let unit = SourceUnit::new("input-src/sample.jsx", "");
        assert_eq!(unit.stem(), "sample");
        assert_eq!(unit.language(), Some(ScriptLanguage::JavaScript));
        assert_eq!(unit.identifier(), "input-src/sample.jsx");
    }

    #[test]
    fn test_identifier_uses_forward_slashes() {
        assert_eq!(
            path_identifier(Path::new("src\\components\\Card.jsx")),
            "src/components/Card.jsx"
        );
    }

    #[test]
    fn test_read_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("widget.ts");
        fs::write(&file_path, "export const id = (x: number) => x;\n").unwrap();

        let unit = SourceUnit::read(&file_path).unwrap();
        assert_eq!(unit.text(), "export const id = (x: number) => x;\n");
        assert_eq!(unit.language(), Some(ScriptLanguage::TypeScript));
    }
}
