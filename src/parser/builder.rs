// Conversion from a tree-sitter tree into the owned arena
//
// Only named nodes become arena nodes. Anonymous tokens survive as text
// attributes when they occupy a grammar field (operators, `let`/`const`).

use std::path::Path;

use tracing::debug;
use tree_sitter::{Node, Tree, TreeCursor};

use super::tree::{node_flags, transform_flags, AstNode, Attribute, NodeId, Span, SyntaxTree};
use crate::language::{self, ScriptLanguage};

/// Attribute holding named children that occupy no grammar field
pub const CHILDREN_ATTRIBUTE: &str = "children";
/// Attribute holding the token text of childless named nodes
pub const TEXT_ATTRIBUTE: &str = "text";

/// Grammar field names that would shadow the node tag in serialized output
fn attribute_name(field: &str) -> &str {
    match field {
        "kind" => "declarationKind",
        other => other,
    }
}

pub(super) struct TreeBuilder<'src> {
    source: &'src str,
    nodes: Vec<AstNode>,
}

/// A named node whose children are still being visited
struct Frame {
    id: NodeId,
    kind: &'static str,
    field: Option<&'static str>,
    is_leaf: bool,
    flags: u32,
    subtree_flags: u32,
    fields: Vec<(String, Attribute)>,
    children: Vec<NodeId>,
}

impl Frame {
    fn attach(&mut self, child: &AstNode, id: NodeId) {
        self.subtree_flags |= child.transform_flags;
        self.children.push(id);
        push_node(
            &mut self.fields,
            attribute_name(child.field.unwrap_or(CHILDREN_ATTRIBUTE)),
            id,
        );
    }
}

impl<'src> TreeBuilder<'src> {
    pub(super) fn new(source: &'src str) -> Self {
        Self {
            source,
            nodes: Vec::new(),
        }
    }

    /// Walk the tree-sitter tree with one cursor and an explicit stack of open
    /// frames, so nesting depth never grows the call stack
    pub(super) fn build(
        mut self,
        tree: &Tree,
        path: &Path,
        language: ScriptLanguage,
    ) -> SyntaxTree {
        let mut cursor = tree.walk();
        let mut stack = vec![self.open(cursor.node(), None, None)];

        let root = 'walk: loop {
            // The cursor sits on the node of the top frame, children unvisited
            if cursor.goto_first_child() {
                if self.seek_named(&mut cursor, &mut stack) {
                    continue;
                }
                cursor.goto_parent();
            }

            // Close finished frames until one has a named sibling left
            while let Some(frame) = stack.pop() {
                let id = self.close(frame);
                let Some(parent) = stack.last_mut() else {
                    break 'walk id;
                };
                parent.attach(&self.nodes[id.0], id);

                if cursor.goto_next_sibling() && self.seek_named(&mut cursor, &mut stack) {
                    continue 'walk;
                }
                cursor.goto_parent();
            }
            break NodeId(0);
        };

        debug!(
            "Built syntax tree for {}: {} nodes ({})",
            path.display(),
            self.nodes.len(),
            language
        );

        SyntaxTree {
            path: path.to_path_buf(),
            language,
            source: self.source.to_string(),
            nodes: self.nodes,
            root,
        }
    }

    fn node_text(&self, node: &Node) -> &'src str {
        self.source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or("")
    }

    /// Advance over siblings from the cursor's position. Anonymous tokens are
    /// folded into the top frame; the first named node gets a new frame.
    fn seek_named(&mut self, cursor: &mut TreeCursor, stack: &mut Vec<Frame>) -> bool {
        loop {
            let node = cursor.node();
            let field = cursor.field_name();

            if node.is_named() {
                let parent = stack.last().map(|frame| (frame.id, frame.kind));
                let frame = self.open(node, parent, field);
                stack.push(frame);
                return true;
            }

            if let (Some(name), Some(frame)) = (field, stack.last_mut()) {
                let token = self.node_text(&node);
                match token {
                    "let" => frame.flags |= node_flags::LET,
                    "const" => frame.flags |= node_flags::CONST,
                    _ => {}
                }
                frame.fields.push((
                    attribute_name(name).to_string(),
                    Attribute::Text(token.to_string()),
                ));
            }

            if !cursor.goto_next_sibling() {
                return false;
            }
        }
    }

    /// Allocate the arena slot in pre-order and start a frame for it
    fn open(
        &mut self,
        node: Node,
        parent: Option<(NodeId, &'static str)>,
        field: Option<&'static str>,
    ) -> Frame {
        let id = NodeId(self.nodes.len());
        let start = node.start_position();
        let end = node.end_position();
        self.nodes.push(AstNode {
            kind: node.kind(),
            span: Span {
                start_byte: node.start_byte(),
                end_byte: node.end_byte(),
                start_line: start.row + 1,
                start_column: start.column,
                end_line: end.row + 1,
                end_column: end.column,
            },
            parent: parent.map(|(id, _)| id),
            field,
            flags: node_flags::NONE,
            transform_flags: transform_flags::NONE,
            fields: Vec::new(),
            children: Vec::new(),
        });

        Frame {
            id,
            kind: node.kind(),
            field,
            is_leaf: node.child_count() == 0,
            flags: own_flags(&node, parent.map(|(_, kind)| kind), field),
            subtree_flags: own_transform_flags(&node),
            fields: Vec::new(),
            children: Vec::new(),
        }
    }

    fn close(&mut self, mut frame: Frame) -> NodeId {
        if frame.is_leaf {
            let span = self.nodes[frame.id.0].span;
            let text = self.source.get(span.start_byte..span.end_byte).unwrap_or("");
            frame
                .fields
                .push((TEXT_ATTRIBUTE.to_string(), Attribute::Text(text.to_string())));
        }

        let entry = &mut self.nodes[frame.id.0];
        entry.flags = frame.flags;
        entry.transform_flags = frame.subtree_flags;
        entry.fields = frame.fields;
        entry.children = frame.children;
        frame.id
    }
}

/// Add a node under an attribute, promoting to a sequence on repeats
fn push_node(fields: &mut Vec<(String, Attribute)>, name: &str, child: NodeId) {
    if let Some((_, existing)) = fields.iter_mut().find(|(field, _)| field == name) {
        match existing {
            Attribute::Nodes(ids) => ids.push(child),
            Attribute::Node(first) => {
                let first = *first;
                *existing = Attribute::Nodes(vec![first, child]);
            }
            Attribute::Text(_) => {}
        }
        return;
    }

    let value = if name == CHILDREN_ATTRIBUTE {
        Attribute::Nodes(vec![child])
    } else {
        Attribute::Node(child)
    };
    fields.push((name.to_string(), value));
}

fn own_flags(node: &Node, parent_kind: Option<&str>, field: Option<&str>) -> u32 {
    let mut flags = node_flags::NONE;
    let kind = node.kind();

    let is_function = language::function_declaration_kinds().contains(&kind)
        || language::function_expression_kinds().contains(&kind)
        || kind == "arrow_function"
        || kind == "method_definition";

    if is_function {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor).filter(|c| !c.is_named()) {
            match child.kind() {
                "async" => flags |= node_flags::ASYNC,
                "*" => flags |= node_flags::GENERATOR,
                _ => {}
            }
        }
        if kind.contains("generator") {
            flags |= node_flags::GENERATOR;
        }
    }

    let exported = parent_kind == Some("export_statement");
    if exported && matches!(field, Some("declaration") | Some("value")) {
        flags |= node_flags::EXPORTED;
    }

    flags
}

fn own_transform_flags(node: &Node) -> u32 {
    let kind = node.kind();
    let mut flags = transform_flags::NONE;

    if kind.starts_with("jsx_") {
        flags |= transform_flags::CONTAINS_JSX;
    }
    if kind.starts_with("type_")
        || kind.ends_with("_type")
        || matches!(
            kind,
            "interface_declaration" | "enum_declaration" | "as_expression" | "non_null_expression"
        )
    {
        flags |= transform_flags::CONTAINS_TYPESCRIPT;
    }
    if matches!(
        kind,
        "arrow_function" | "lexical_declaration" | "class_declaration" | "template_string"
    ) {
        flags |= transform_flags::CONTAINS_ES2015;
    }
    if kind == "await_expression" {
        flags |= transform_flags::CONTAINS_ASYNC;
    }
    if kind.contains("generator") || kind == "yield_expression" {
        flags |= transform_flags::CONTAINS_GENERATOR;
    }

    flags
}
