// Path helpers for source units and artifacts
//
// Stems follow the rule the migration pipeline has always used: strip a
// trailing `.js`, `.jsx`, `.ts` or `.tsx` from the file name and keep the rest.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_EXTENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.[jt]sx?$").expect("static regex"));

/// Derive the stem used to prefix artifact names
///
/// # Examples
/// ```
/// use migrate_core::utils::paths::source_stem;
/// use std::path::Path;
///
/// assert_eq!(source_stem(Path::new("src/sample.js")), "sample");
/// assert_eq!(source_stem(Path::new("Dashboard.test.tsx")), "Dashboard.test");
/// ```
pub fn source_stem(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();

    SCRIPT_EXTENSION_RE.replace(&file_name, "").into_owned()
}

/// Lowercased extension of a source path, if it has one
pub fn source_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// `{directory}/{name}.{extension}`
pub fn artifact_path(directory: &Path, name: &str, extension: &str) -> PathBuf {
    directory.join(format!("{}.{}", name, extension))
}
