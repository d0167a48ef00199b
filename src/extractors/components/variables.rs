//! Function-valued binding extraction
//!
//! `const Foo = () => {}` and `let Foo = function () {}`. The artifact is the
//! declarator text (`Foo = () => {}`), without the `const`/`let`/`var` keyword.

use crate::error::ExtractError;
use crate::extractors::types::{Declaration, DeclarationKind, DeclaredName};
use crate::parser::{NodeId, SyntaxTree};
use crate::source::path_identifier;

impl super::ComponentExtractor {
    pub(super) fn extract_binding(
        &self,
        tree: &SyntaxTree,
        id: NodeId,
        kind: DeclarationKind,
    ) -> Result<Declaration, ExtractError> {
        let node = tree.node(id);
        let name = match kind.declared_name(tree, id) {
            DeclaredName::Identifier(name) => name.to_string(),
            DeclaredName::Pattern(pattern) => {
                return Err(unresolved(tree, id, pattern));
            }
            DeclaredName::Missing => return Err(unresolved(tree, id, "nothing")),
        };

        Ok(Declaration::new(
            kind,
            Some(name),
            node.span(),
            path_identifier(tree.path()),
            tree.unparse(id).to_string(),
        ))
    }
}

fn unresolved(tree: &SyntaxTree, id: NodeId, pattern: &str) -> ExtractError {
    let span = tree.node(id).span();
    ExtractError::UnresolvedName {
        source_unit: path_identifier(tree.path()),
        line: span.start_line,
        column: span.start_column,
        pattern: pattern.to_string(),
    }
}
