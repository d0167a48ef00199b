//! Parser adapter
//!
//! Wraps tree-sitter: source text plus an identifying path in, an owned
//! [`SyntaxTree`] out. Tree-sitter recovers from syntax errors by inserting
//! `ERROR` and missing nodes; the adapter refuses such trees instead of handing
//! a partial tree downstream.

mod bindings;
mod builder;
mod tree;

pub use bindings::DECLARATION_ATTRIBUTE;
pub use builder::{CHILDREN_ATTRIBUTE, TEXT_ATTRIBUTE};
pub use tree::{
    node_flags, transform_flags, AstNode, Attribute, AttributeRef, NodeId, Preorder, Span,
    SyntaxTree,
};

use std::path::Path;

use tracing::debug;
use tree_sitter::{Node, Parser};

use crate::error::ParseError;
use crate::language::ScriptLanguage;

const SNIPPET_CHARS: usize = 24;

/// Whether identifier references get `declaration` links after parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Linking {
    /// Resolve references (normalized output shows them)
    #[default]
    Resolve,
    /// Structure only; extraction never reads the links
    Skip,
}

/// Parse a source unit, selecting the grammar from the path's extension
pub fn parse(path: &Path, text: &str) -> Result<SyntaxTree, ParseError> {
    parse_with(detect(path)?, path, text)
}

/// Parse without resolving identifier references
pub fn parse_unlinked(path: &Path, text: &str) -> Result<SyntaxTree, ParseError> {
    parse_with_linking(detect(path)?, path, text, Linking::Skip)
}

/// Parse a source unit with an explicit grammar
pub fn parse_with(
    language: ScriptLanguage,
    path: &Path,
    text: &str,
) -> Result<SyntaxTree, ParseError> {
    parse_with_linking(language, path, text, Linking::Resolve)
}

pub fn parse_with_linking(
    language: ScriptLanguage,
    path: &Path,
    text: &str,
    linking: Linking,
) -> Result<SyntaxTree, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&language.tree_sitter_language())
        .map_err(|e| ParseError::Grammar {
            language: language.to_string(),
            message: e.to_string(),
        })?;

    let ts_tree = parser
        .parse(text, None)
        .ok_or_else(|| ParseError::Aborted {
            path: path.to_path_buf(),
        })?;

    let root = ts_tree.root_node();
    if root.has_error() {
        let offending = first_error(root).unwrap_or(root);
        return Err(syntax_error(path, text, &offending));
    }

    let mut tree = builder::TreeBuilder::new(text).build(&ts_tree, path, language);
    if linking == Linking::Skip {
        return Ok(tree);
    }

    let links = bindings::resolve_bindings(&tree);
    debug!(
        "Resolved {} identifier references in {}",
        links.len(),
        path.display()
    );
    for (reference, declaration) in links {
        tree.nodes[reference.0].fields.push((
            DECLARATION_ATTRIBUTE.to_string(),
            Attribute::Node(declaration),
        ));
    }

    Ok(tree)
}

fn detect(path: &Path) -> Result<ScriptLanguage, ParseError> {
    ScriptLanguage::from_path(path).ok_or_else(|| ParseError::UnsupportedExtension {
        path: path.to_path_buf(),
    })
}

/// First `ERROR` or missing node in document order
fn first_error(root: Node) -> Option<Node> {
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() {
            let mut cursor = node.walk();
            let children: Vec<Node> = node.children(&mut cursor).collect();
            pending.extend(children.into_iter().rev());
        }
    }
    None
}

fn syntax_error(path: &Path, text: &str, node: &Node) -> ParseError {
    let position = node.start_position();
    let snippet = if node.is_missing() {
        format!("missing {}", node.kind())
    } else {
        let raw = text.get(node.start_byte()..node.end_byte()).unwrap_or("");
        raw.chars().take(SNIPPET_CHARS).collect()
    };

    ParseError::Syntax {
        path: path.to_path_buf(),
        line: position.row + 1,
        column: position.column,
        byte: node.start_byte(),
        snippet,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse_js(code: &str) -> SyntaxTree {
        parse(&PathBuf::from("sample.js"), code).unwrap()
    }

    #[test]
    fn test_root_is_program() {
        let tree = parse_js("function Foo() {}\n");
        let root = tree.node(tree.root());

        assert_eq!(root.kind(), "program");
        assert_eq!(root.parent(), None);
        assert_eq!(tree.node(root.children()[0]).kind(), "function_declaration");
    }

    #[test]
    fn test_unparse_returns_exact_source_slice() {
        let code = "const Bar = () => {\n  return 1;\n};\n";
        let tree = parse_js(code);
        let declarator = tree
            .preorder()
            .find(|id| tree.node(*id).kind() == "variable_declarator")
            .unwrap();

        assert_eq!(tree.unparse(declarator), "Bar = () => {\n  return 1;\n}");
    }

    #[test]
    fn test_unbalanced_brace_is_a_parse_error() {
        let result = parse(&PathBuf::from("broken.js"), "function Foo() {\n  return 1;\n");

        match result {
            Err(ParseError::Syntax { path, line, .. }) => {
                assert_eq!(path, PathBuf::from("broken.js"));
                assert!(line >= 1);
            }
            other => panic!("expected a syntax error, got {:?}", other.map(|t| t.len())),
        }
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let result = parse(&PathBuf::from("notes.txt"), "function Foo() {}");
        assert!(matches!(
            result,
            Err(ParseError::UnsupportedExtension { .. })
        ));
    }

    #[test]
    fn test_jsx_markup_parses_in_javascript() {
        let tree = parse_js("const Card = ({ user }) => <div className=\"card\">{user.name}</div>;\n");
        let root = tree.node(tree.root());

        assert!(tree.preorder().any(|id| tree.node(id).kind() == "jsx_element"));
        assert_ne!(root.transform_flags() & transform_flags::CONTAINS_JSX, 0);
    }

    #[test]
    fn test_tsx_type_annotations_parse() {
        let tree = parse(
            &PathBuf::from("Card.tsx"),
            "function Card(props: { name: string }): JSX.Element { return <b>{props.name}</b>; }\n",
        )
        .unwrap();

        assert_eq!(tree.language(), ScriptLanguage::Tsx);
        assert!(tree
            .preorder()
            .any(|id| tree.node(id).kind() == "type_annotation"));
    }

    #[test]
    fn test_const_and_async_flags() {
        let tree = parse_js("const load = async () => { await fetch('/api'); };\n");
        let declaration = tree
            .preorder()
            .find(|id| tree.node(*id).kind() == "lexical_declaration")
            .unwrap();
        let arrow = tree
            .preorder()
            .find(|id| tree.node(*id).kind() == "arrow_function")
            .unwrap();

        assert_eq!(tree.node(declaration).flags() & node_flags::CONST, node_flags::CONST);
        assert_eq!(tree.node(arrow).flags() & node_flags::ASYNC, node_flags::ASYNC);
        assert_eq!(
            tree.node(declaration).attribute("declarationKind"),
            Some(&Attribute::Text("const".to_string()))
        );
    }

    #[test]
    fn test_self_reference_links_to_declaration() {
        let tree = parse_js("function f() { return f; }\n");
        let function = tree
            .preorder()
            .find(|id| tree.node(*id).kind() == "function_declaration")
            .unwrap();
        let returned = tree
            .preorder()
            .find(|id| {
                let node = tree.node(*id);
                node.kind() == "identifier" && node.field() != Some("name")
            })
            .unwrap();

        assert_eq!(
            tree.node(returned).attribute(DECLARATION_ATTRIBUTE),
            Some(&Attribute::Node(function))
        );
    }

    #[test]
    fn test_parameter_shadows_outer_binding() {
        let tree = parse_js("const x = 1;\nfunction g(x) { return x; }\n");
        let parameter = tree
            .preorder()
            .find(|id| tree.node(*id).kind() == "formal_parameters")
            .map(|params| tree.node(params).children()[0])
            .unwrap();
        let reference = tree
            .preorder()
            .filter(|id| tree.node(*id).kind() == "identifier")
            .last()
            .unwrap();

        assert_eq!(
            tree.node(reference).attribute(DECLARATION_ATTRIBUTE),
            Some(&Attribute::Node(parameter))
        );
    }

    #[test]
    fn test_forward_reference_stays_unlinked() {
        let tree = parse_js("run();\nfunction run() {}\n");
        let call_target = tree
            .preorder()
            .find(|id| tree.node(*id).kind() == "identifier")
            .unwrap();

        assert_eq!(tree.node(call_target).attribute(DECLARATION_ATTRIBUTE), None);
    }

    fn chain(terms: usize) -> String {
        let mut code = String::from("const a = 1;\nconst s = 1");
        for _ in 0..terms {
            code.push_str(" + a");
        }
        code.push_str(";\n");
        code
    }

    #[test]
    fn test_deeply_nested_expression_builds_and_links() {
        let tree = parse_js(&chain(20_000));

        let declarator = tree
            .preorder()
            .find(|id| tree.node(*id).kind() == "variable_declarator")
            .unwrap();
        let references: Vec<NodeId> = tree
            .preorder()
            .filter(|id| {
                let node = tree.node(*id);
                node.kind() == "identifier"
                    && node.field() != Some("name")
                    && tree.unparse(*id) == "a"
            })
            .collect();

        assert_eq!(
            tree.preorder()
                .filter(|id| tree.node(*id).kind() == "binary_expression")
                .count(),
            20_000
        );
        assert_eq!(references.len(), 20_000);
        assert!(references.iter().all(|id| {
            tree.node(*id).attribute(DECLARATION_ATTRIBUTE) == Some(&Attribute::Node(declarator))
        }));
    }

    #[test]
    fn test_unlinked_parse_skips_declaration_links() {
        let tree =
            parse_unlinked(&PathBuf::from("sample.js"), "function f() { return f; }\n").unwrap();

        assert!(tree
            .preorder()
            .all(|id| tree.node(id).attribute(DECLARATION_ATTRIBUTE).is_none()));
        assert_eq!(tree.node(tree.root()).kind(), "program");
    }

    #[test]
    fn test_default_value_is_not_a_parameter() {
        let tree = parse_js("const b = 2;\nconst f = (a = b) => a;\n");
        let b_declarator = tree
            .preorder()
            .find(|id| tree.node(*id).kind() == "variable_declarator")
            .unwrap();
        let default_value = tree
            .preorder()
            .find(|id| tree.node(*id).kind() == "assignment_pattern")
            .and_then(|pattern| tree.node(pattern).child_by_field("right"))
            .unwrap();

        assert_eq!(
            tree.node(default_value).attribute(DECLARATION_ATTRIBUTE),
            Some(&Attribute::Node(b_declarator))
        );
    }
}
