// Error taxonomy for the migration core
//
// Every failure aborts processing of the current source unit. There is no retry.

use std::path::PathBuf;
use thiserror::Error;

/// Malformed or unparseable source. No tree and no partial output is produced.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unsupported script extension for '{}' (expected .js, .jsx, .ts or .tsx)", .path.display())]
    UnsupportedExtension { path: PathBuf },

    #[error("failed to load {language} grammar: {message}")]
    Grammar { language: String, message: String },

    /// `line` is 1-based, `column` is 0-based, `byte` is the absolute offset
    #[error("{}:{line}:{column}: syntax error near `{snippet}`", .path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        column: usize,
        byte: usize,
        snippet: String,
    },

    #[error("parser returned no tree for '{}'", .path.display())]
    Aborted { path: PathBuf },
}

/// Directory creation or file write failure in an artifact sink
#[derive(Debug, Error)]
#[error("storage failure at '{}': {source}", .path.display())]
pub struct StorageError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl StorageError {
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Errors surfaced by the component extractor
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A function-valued binding whose target is not a plain identifier
    #[error("{source_unit}:{line}:{column}: function-valued binding has no identifier (found {pattern})")]
    UnresolvedName {
        source_unit: String,
        line: usize,
        column: usize,
        pattern: String,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures rendering a syntax tree as JSON
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Serializing and dropping JSON values recurse once per level, so trees
    /// deeper than the limit are refused
    #[error("syntax tree for '{}' nests deeper than {limit} levels", .path.display())]
    TooDeep { path: PathBuf, limit: usize },

    #[error("failed to serialize normalized tree: {0}")]
    Serialize(#[from] serde_json::Error),
}
