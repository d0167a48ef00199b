//! Function declaration extraction
//!
//! Covers `function` and `function*` declarations at any depth, including
//! ones nested inside other function bodies.

use crate::extractors::types::{Declaration, DeclarationKind, DeclaredName};
use crate::parser::{NodeId, SyntaxTree};
use crate::source::path_identifier;

impl super::ComponentExtractor {
    /// Extract a function declaration; the artifact is the whole declaration text
    pub(super) fn extract_function(&self, tree: &SyntaxTree, id: NodeId) -> Declaration {
        let kind = DeclarationKind::FunctionDeclaration;
        // `export default function () {}` is the only nameless shape; it gets the fallback name
        let name = match kind.declared_name(tree, id) {
            DeclaredName::Identifier(name) => Some(name.to_string()),
            DeclaredName::Missing | DeclaredName::Pattern(_) => None,
        };

        Declaration::new(
            kind,
            name,
            tree.node(id).span(),
            path_identifier(tree.path()),
            tree.unparse(id).to_string(),
        )
    }
}
