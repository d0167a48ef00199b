//! Extractors
//!
//! Tree-sitter based extraction over parsed JavaScript/TypeScript source units.
//!
//! - `types.rs` - declaration shapes, declarations and artifacts
//! - `components/` - the component extractor (function declarations and
//!   function-valued bindings)

pub mod components;
pub mod types;

pub use components::{ComponentExtractor, ExtractionReport};
pub use types::{Artifact, Declaration, DeclarationKind, DeclaredName};
