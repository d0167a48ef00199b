// Migrate Core - tree-sitter component extraction and AST normalization
//
// Two independent paths share one parser adapter:
// - source unit -> parser -> component extractor -> artifact sink
// - source unit -> parser -> AST normalizer -> JSON

pub mod config;
pub mod error;
pub mod extractors;
pub mod language;
pub mod normalizer;
pub mod parser;
pub mod sink;
pub mod source;
pub mod utils;

pub use config::ExtractorConfig;
pub use error::{ExtractError, NormalizeError, ParseError, StorageError};
pub use extractors::{Artifact, ComponentExtractor, Declaration, DeclarationKind};
pub use language::ScriptLanguage;
pub use normalizer::{AstNormalizer, FieldPolicy};
pub use parser::{parse, parse_with, SyntaxTree};
pub use sink::{ArtifactSink, DirectorySink, MemorySink};
pub use source::SourceUnit;
