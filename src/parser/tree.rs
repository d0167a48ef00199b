// Owned syntax tree for one source unit
//
// Nodes live in an arena and refer to each other by `NodeId`. A node's attribute
// view includes its parent back-reference and any resolved `declaration` link,
// so walking attributes naively is a cyclic graph traversal.

use std::path::{Path, PathBuf};

use crate::language::ScriptLanguage;

/// Index of a node in its `SyntaxTree` arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Byte and line/column extent of a node (line 1-based, column 0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start_byte: usize,
    pub end_byte: usize,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

/// Node flag bits (`flags` attribute)
pub mod node_flags {
    pub const NONE: u32 = 0;
    pub const LET: u32 = 1;
    pub const CONST: u32 = 1 << 1;
    pub const EXPORTED: u32 = 1 << 5;
    pub const ASYNC: u32 = 1 << 8;
    pub const GENERATOR: u32 = 1 << 9;
}

/// Subtree summary bits (`transformFlags` attribute)
pub mod transform_flags {
    pub const NONE: u32 = 0;
    pub const CONTAINS_TYPESCRIPT: u32 = 1;
    pub const CONTAINS_JSX: u32 = 1 << 1;
    pub const CONTAINS_ES2015: u32 = 1 << 10;
    pub const CONTAINS_ASYNC: u32 = 1 << 11;
    pub const CONTAINS_GENERATOR: u32 = 1 << 12;
}

/// A stored syntactic attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Text(String),
    Node(NodeId),
    Nodes(Vec<NodeId>),
}

/// Borrowed attribute value, covering both metadata and syntactic fields
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeRef<'a> {
    Int(u64),
    Text(&'a str),
    Node(NodeId),
    Nodes(&'a [NodeId]),
}

impl Attribute {
    pub fn as_ref(&self) -> AttributeRef<'_> {
        match self {
            Attribute::Text(text) => AttributeRef::Text(text),
            Attribute::Node(id) => AttributeRef::Node(*id),
            Attribute::Nodes(ids) => AttributeRef::Nodes(ids),
        }
    }
}

/// A syntax node
#[derive(Debug, Clone)]
pub struct AstNode {
    pub(crate) kind: &'static str,
    pub(crate) span: Span,
    pub(crate) parent: Option<NodeId>,
    /// Grammar field this node occupies in its parent, if any
    pub(crate) field: Option<&'static str>,
    pub(crate) flags: u32,
    pub(crate) transform_flags: u32,
    pub(crate) fields: Vec<(String, Attribute)>,
    /// Named children in source order
    pub(crate) children: Vec<NodeId>,
}

impl AstNode {
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn field(&self) -> Option<&'static str> {
        self.field
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn transform_flags(&self) -> u32 {
        self.transform_flags
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Look up a syntactic attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Single child stored under a grammar field
    pub fn child_by_field(&self, name: &str) -> Option<NodeId> {
        match self.attribute(name)? {
            Attribute::Node(id) => Some(*id),
            Attribute::Nodes(ids) => ids.first().copied(),
            Attribute::Text(_) => None,
        }
    }

    /// All attributes in a stable order: metadata first, then syntactic fields
    /// in the order the grammar produced them
    pub fn attributes(&self) -> impl Iterator<Item = (&str, AttributeRef<'_>)> + '_ {
        let metadata = [
            ("pos", Some(AttributeRef::Int(self.span.start_byte as u64))),
            ("end", Some(AttributeRef::Int(self.span.end_byte as u64))),
            ("flags", Some(AttributeRef::Int(self.flags as u64))),
            (
                "transformFlags",
                Some(AttributeRef::Int(self.transform_flags as u64)),
            ),
            ("parent", self.parent.map(AttributeRef::Node)),
        ];

        metadata
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .chain(
                self.fields
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_ref())),
            )
    }
}

/// Parsed source unit: node arena plus the text it spans
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub(crate) path: PathBuf,
    pub(crate) language: ScriptLanguage,
    pub(crate) source: String,
    pub(crate) nodes: Vec<AstNode>,
    pub(crate) root: NodeId,
}

impl SyntaxTree {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn language(&self) -> ScriptLanguage {
        self.language
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Reconstruct the exact source text spanned by a node
    pub fn unparse(&self, id: NodeId) -> &str {
        let span = self.node(id).span;
        self.source.get(span.start_byte..span.end_byte).unwrap_or("")
    }

    /// Pre-order, left-to-right walk over structural children
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![self.root],
        }
    }
}

/// Document-order iterator returned by `SyntaxTree::preorder`
pub struct Preorder<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.node(id).children.iter().rev().copied());
        Some(id)
    }
}
