//! Language Support - Shared tree-sitter language configuration
//!
//! This module provides centralized support for the JavaScript family of languages.
//! ALL grammar selection should go through here to avoid duplication between the
//! extraction and normalization paths.

use std::fmt;
use std::path::Path;

/// Script languages understood by the parser adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptLanguage {
    /// JavaScript, including JSX markup expressions
    JavaScript,
    TypeScript,
    /// TypeScript with JSX markup expressions
    Tsx,
}

impl ScriptLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptLanguage::JavaScript => "javascript",
            ScriptLanguage::TypeScript => "typescript",
            ScriptLanguage::Tsx => "tsx",
        }
    }

    /// Get the tree-sitter grammar for this language
    pub fn tree_sitter_language(&self) -> tree_sitter::Language {
        match self {
            ScriptLanguage::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            ScriptLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            ScriptLanguage::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Detect language from a file path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(detect_language_from_extension)
    }
}

impl fmt::Display for ScriptLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect language from file extension
///
/// Extensions are matched case-insensitively (`App.JSX` is still JSX).
pub fn detect_language_from_extension(extension: &str) -> Option<ScriptLanguage> {
    match extension.to_ascii_lowercase().as_str() {
        "js" | "jsx" | "mjs" | "cjs" => Some(ScriptLanguage::JavaScript),
        "ts" | "mts" | "cts" => Some(ScriptLanguage::TypeScript),
        "tsx" => Some(ScriptLanguage::Tsx),
        _ => None,
    }
}

/// Node kinds that declare a named function
pub fn function_declaration_kinds() -> &'static [&'static str] {
    &["function_declaration", "generator_function_declaration"]
}

/// Node kinds that are function-valued expressions
///
/// `function` is the pre-0.21 grammar name for `function_expression`.
pub fn function_expression_kinds() -> &'static [&'static str] {
    &["function_expression", "function", "generator_function"]
}

/// Node kinds that open a lexical scope for name binding
pub fn scope_node_kinds() -> &'static [&'static str] {
    &[
        "program",
        "statement_block",
        "function_declaration",
        "generator_function_declaration",
        "function_expression",
        "function",
        "generator_function",
        "arrow_function",
        "method_definition",
    ]
}
