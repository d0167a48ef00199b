//! AST normalizer
//!
//! Renders a [`SyntaxTree`] as JSON for diffing and inspection. Metadata fields
//! are removed per [`FieldPolicy`], and any node reached a second time (through
//! a `declaration` link, for example) renders as `"[Circular]"` instead of
//! being walked again.
//!
//! Rendering keeps its own work stack. Trees nested deeper than the configured
//! limit are refused with [`NormalizeError::TooDeep`].

pub mod policy;

pub use policy::{FieldPolicy, FieldRule, FieldRuleError, KindSelector};

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::NormalizeError;
use crate::parser::{AttributeRef, NodeId, SyntaxTree};

/// Rendered in place of a node that was already visited
pub const CIRCULAR_MARKER: &str = "[Circular]";

/// Key holding the node's kind tag, always first in a rendered node
pub const KIND_KEY: &str = "kind";

/// Default limit on nested nodes in one rendering
pub const DEFAULT_MAX_DEPTH: usize = 1_000;

#[derive(Debug, Clone)]
pub struct AstNormalizer {
    policy: FieldPolicy,
    max_depth: usize,
}

impl Default for AstNormalizer {
    fn default() -> Self {
        Self::with_policy(FieldPolicy::default())
    }
}

/// State for one normalize call. Never shared between calls.
struct NormalizeContext<'a> {
    tree: &'a SyntaxTree,
    policy: &'a FieldPolicy,
    max_depth: usize,
    visited: HashSet<NodeId>,
    circular: usize,
}

/// A node whose attributes are being rendered
struct Frame<'a> {
    kind: &'static str,
    object: Map<String, Value>,
    /// Remaining attributes, last one first
    attributes: Vec<(&'a str, AttributeRef<'a>)>,
    /// Attribute waiting for a single child's value
    awaiting: Option<&'a str>,
    /// Sequence being filled: key, rendered items, items still to render
    sequence: Option<(&'a str, Vec<Value>, &'a [NodeId])>,
}

impl<'a> Frame<'a> {
    fn new(tree: &'a SyntaxTree, id: NodeId) -> Self {
        let node = tree.node(id);
        let mut object = Map::new();
        object.insert(KIND_KEY.to_string(), Value::String(node.kind().to_string()));
        let mut attributes: Vec<_> = node.attributes().collect();
        attributes.reverse();

        Self {
            kind: node.kind(),
            object,
            attributes,
            awaiting: None,
            sequence: None,
        }
    }

    fn accept(&mut self, value: Value) {
        if let Some((_, items, _)) = &mut self.sequence {
            items.push(value);
        } else if let Some(key) = self.awaiting.take() {
            self.object.insert(key.to_string(), value);
        }
    }

    /// Render scalars in place and return the next child to descend into
    fn next_child(&mut self, policy: &FieldPolicy) -> Option<NodeId> {
        loop {
            if let Some((key, items, rest)) = self.sequence.take() {
                if let Some((first, tail)) = rest.split_first() {
                    self.sequence = Some((key, items, tail));
                    return Some(*first);
                }
                self.object.insert(key.to_string(), Value::Array(items));
                continue;
            }

            let (name, value) = self.attributes.pop()?;
            // Checked before descending so dropped links are never walked
            if policy.is_dropped(self.kind, name) {
                continue;
            }
            match value {
                AttributeRef::Int(n) => {
                    self.object.insert(name.to_string(), Value::from(n));
                }
                AttributeRef::Text(text) => {
                    self.object
                        .insert(name.to_string(), Value::String(text.to_string()));
                }
                AttributeRef::Node(child) => {
                    self.awaiting = Some(name);
                    return Some(child);
                }
                AttributeRef::Nodes(children) => {
                    self.sequence = Some((name, Vec::with_capacity(children.len()), children));
                }
            }
        }
    }
}

impl AstNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: FieldPolicy) -> Self {
        Self {
            policy,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn policy(&self) -> &FieldPolicy {
        &self.policy
    }

    /// Normalize the whole tree from its root
    pub fn normalize(&self, tree: &SyntaxTree) -> Result<Value, NormalizeError> {
        self.normalize_node(tree, tree.root())
    }

    /// Normalize the subtree rooted at `id`
    pub fn normalize_node(
        &self,
        tree: &SyntaxTree,
        id: NodeId,
    ) -> Result<Value, NormalizeError> {
        let mut context = NormalizeContext {
            tree,
            policy: &self.policy,
            max_depth: self.max_depth,
            visited: HashSet::new(),
            circular: 0,
        };
        let value = context.render(id)?;
        debug!(
            "Normalized {} nodes from {} ({} circular references)",
            context.visited.len(),
            tree.path().display(),
            context.circular
        );
        Ok(value)
    }

    /// Pretty-printed JSON
    pub fn to_json_string(&self, tree: &SyntaxTree) -> Result<String, NormalizeError> {
        Ok(serde_json::to_string_pretty(&self.normalize(tree)?)?)
    }

    /// Single-line JSON
    pub fn to_compact_json_string(&self, tree: &SyntaxTree) -> Result<String, NormalizeError> {
        Ok(serde_json::to_string(&self.normalize(tree)?)?)
    }
}

impl<'a> NormalizeContext<'a> {
    fn render(&mut self, root: NodeId) -> Result<Value, NormalizeError> {
        let mut stack: Vec<Frame<'a>> = Vec::new();
        let mut finished = self.enter(root, &mut stack)?;

        loop {
            if let Some(value) = finished.take() {
                match stack.last_mut() {
                    Some(frame) => frame.accept(value),
                    None => return Ok(value),
                }
            }

            let Some(frame) = stack.last_mut() else {
                return Ok(Value::Null);
            };
            match frame.next_child(self.policy) {
                Some(child) => finished = self.enter(child, &mut stack)?,
                None => finished = stack.pop().map(|frame| Value::Object(frame.object)),
            }
        }
    }

    /// Open a frame for `id`, or return its value right away on a revisit
    fn enter(
        &mut self,
        id: NodeId,
        stack: &mut Vec<Frame<'a>>,
    ) -> Result<Option<Value>, NormalizeError> {
        if !self.visited.insert(id) {
            self.circular += 1;
            return Ok(Some(Value::String(CIRCULAR_MARKER.to_string())));
        }
        if stack.len() >= self.max_depth {
            return Err(NormalizeError::TooDeep {
                path: self.tree.path().to_path_buf(),
                limit: self.max_depth,
            });
        }

        stack.push(Frame::new(self.tree, id));
        Ok(None)
    }
}
