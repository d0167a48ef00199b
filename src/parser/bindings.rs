// Best-effort lexical name binding
//
// Links identifier references to the node that declares them: a function or
// class declaration, a variable declarator, or a parameter identifier. One
// pre-order pass keeps a stack of open scopes; a reference only sees
// declarations already visited in a scope that is still open, so hoisted
// forward references stay unlinked.

use std::collections::HashMap;

use super::tree::{NodeId, SyntaxTree};
use crate::language;

/// Attribute linking a reference identifier to its declaring node
pub const DECLARATION_ATTRIBUTE: &str = "declaration";

struct Scope<'t> {
    /// Parameters bind here; `program` and plain blocks are not function scopes
    is_function: bool,
    /// Latest declaration per name
    names: HashMap<&'t str, NodeId>,
}

enum Visit {
    Enter(NodeId),
    Leave,
}

/// Compute `(reference, declaration)` links for every resolvable reference
pub(super) fn resolve_bindings(tree: &SyntaxTree) -> Vec<(NodeId, NodeId)> {
    let mut scopes: Vec<Scope<'_>> = Vec::new();
    let mut links = Vec::new();
    let mut pending = vec![Visit::Enter(tree.root())];

    while let Some(visit) = pending.pop() {
        let id = match visit {
            Visit::Enter(id) => id,
            Visit::Leave => {
                scopes.pop();
                continue;
            }
        };
        let node = tree.node(id);

        if let Some((name, is_parameter)) = declared_name(tree, id) {
            let scope = if is_parameter {
                scopes.iter_mut().rev().find(|scope| scope.is_function)
            } else {
                scopes.last_mut()
            };
            if let Some(scope) = scope {
                scope.names.insert(name, id);
            }
        }

        if is_reference(tree, id) {
            let name = tree.unparse(id);
            if let Some(declaration) = scopes
                .iter()
                .rev()
                .find_map(|scope| scope.names.get(name).copied())
            {
                links.push((id, declaration));
            }
        }

        if language::scope_node_kinds().contains(&node.kind()) {
            scopes.push(Scope {
                is_function: !matches!(node.kind(), "program" | "statement_block"),
                names: HashMap::new(),
            });
            pending.push(Visit::Leave);
        }
        pending.extend(node.children().iter().rev().map(|child| Visit::Enter(*child)));
    }

    links
}

/// Name bound by a declaring node, and whether it is a parameter
fn declared_name(tree: &SyntaxTree, id: NodeId) -> Option<(&str, bool)> {
    let node = tree.node(id);
    match node.kind() {
        "function_declaration"
        | "generator_function_declaration"
        | "class_declaration"
        | "variable_declarator" => node
            .child_by_field("name")
            .filter(|name| matches!(tree.node(*name).kind(), "identifier" | "type_identifier"))
            .map(|name| (tree.unparse(name), false)),
        "identifier" if is_parameter(tree, id) => Some((tree.unparse(id), true)),
        _ => None,
    }
}

fn is_parameter(tree: &SyntaxTree, id: NodeId) -> bool {
    let node = tree.node(id);
    if node.kind() != "identifier" {
        return false;
    }
    let parent_kind = node.parent().map(|p| tree.node(p).kind());
    match parent_kind {
        Some("formal_parameters") | Some("rest_pattern") => true,
        // `(a = 1) => a`: only the left side binds
        Some("assignment_pattern") => node.field() == Some("left"),
        _ => matches!(node.field(), Some("parameter") | Some("pattern")),
    }
}

fn is_reference(tree: &SyntaxTree, id: NodeId) -> bool {
    let node = tree.node(id);
    if node.kind() != "identifier" || is_parameter(tree, id) {
        return false;
    }
    if node.field() == Some("name") {
        return false;
    }
    let parent_kind = node.parent().map(|p| tree.node(p).kind());
    !matches!(
        parent_kind,
        Some("import_clause")
            | Some("namespace_import")
            | Some("import_specifier")
            | Some("object_pattern")
            | Some("array_pattern")
    )
}
