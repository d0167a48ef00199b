// Extraction configuration
//
// Defaults reproduce the migration pipeline's historical behavior: artifacts go
// to `./extracted`, anonymous function declarations are named `Unnamed`, and the
// artifact keeps the source file's own extension.

use std::path::PathBuf;

/// Default output directory for extracted artifacts
pub const DEFAULT_OUTPUT_DIR: &str = "./extracted";
/// Name used for function declarations without an identifier
pub const FALLBACK_NAME: &str = "Unnamed";

/// Configuration for component extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Directory artifacts are written into (created on demand)
    pub output_dir: PathBuf,
    /// Name substituted for anonymous function declarations
    pub fallback_name: String,
    /// Force every artifact to this extension instead of the source's own
    pub extension_override: Option<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            fallback_name: FALLBACK_NAME.to_string(),
            extension_override: None,
        }
    }
}

impl ExtractorConfig {
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension_override = Some(extension.trim_start_matches('.').to_string());
        self
    }
}
