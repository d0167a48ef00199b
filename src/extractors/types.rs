// Component extraction types
//
// Declarations are classified through a closed enum so every eligible node shape
// is handled explicitly; adding a shape means adding a variant.

use serde::Serialize;

use crate::language;
use crate::parser::{NodeId, Span, SyntaxTree};

/// The fixed set of node shapes eligible for extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeclarationKind {
    /// `function Foo() {}` at any depth
    FunctionDeclaration,
    /// `const Foo = function () {}`
    FunctionExpressionBinding,
    /// `const Foo = () => {}`
    ArrowFunctionBinding,
}

/// Outcome of reading a declaration's name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredName<'t> {
    Identifier(&'t str),
    /// No name node at all
    Missing,
    /// Name position holds something other than an identifier, e.g. `object_pattern`
    Pattern(&'static str),
}

impl DeclarationKind {
    /// Classify a node, returning `None` for ineligible shapes
    pub fn classify(tree: &SyntaxTree, id: NodeId) -> Option<Self> {
        let node = tree.node(id);
        match node.kind() {
            kind if language::function_declaration_kinds().contains(&kind) => {
                Some(DeclarationKind::FunctionDeclaration)
            }
            // The grammar has no nameless declaration: `export default function () {}`
            // parses as an exported function expression
            kind if language::function_expression_kinds().contains(&kind)
                && is_default_export(tree, id) =>
            {
                Some(DeclarationKind::FunctionDeclaration)
            }
            "variable_declarator" => {
                let value = function_value(tree, node.child_by_field("value")?);
                match tree.node(value).kind() {
                    "arrow_function" => Some(DeclarationKind::ArrowFunctionBinding),
                    kind if language::function_expression_kinds().contains(&kind) => {
                        Some(DeclarationKind::FunctionExpressionBinding)
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Read the declared name of a node of this kind
    pub fn declared_name<'t>(&self, tree: &'t SyntaxTree, id: NodeId) -> DeclaredName<'t> {
        let name = tree.node(id).child_by_field("name");
        match self {
            DeclarationKind::FunctionDeclaration => name
                .filter(|name| tree.node(*name).kind() == "identifier")
                .map_or(DeclaredName::Missing, |name| {
                    DeclaredName::Identifier(tree.unparse(name))
                }),
            DeclarationKind::FunctionExpressionBinding | DeclarationKind::ArrowFunctionBinding => {
                match name {
                    Some(name) if tree.node(name).kind() == "identifier" => {
                        DeclaredName::Identifier(tree.unparse(name))
                    }
                    Some(name) => DeclaredName::Pattern(tree.node(name).kind()),
                    None => DeclaredName::Missing,
                }
            }
        }
    }

    pub fn is_binding(&self) -> bool {
        match self {
            DeclarationKind::FunctionDeclaration => false,
            DeclarationKind::FunctionExpressionBinding | DeclarationKind::ArrowFunctionBinding => {
                true
            }
        }
    }
}

fn is_default_export(tree: &SyntaxTree, id: NodeId) -> bool {
    let node = tree.node(id);
    node.field() == Some("value")
        && node
            .parent()
            .is_some_and(|parent| tree.node(parent).kind() == "export_statement")
}

/// Look through parentheses: `const f = (() => 1)` binds an arrow function
fn function_value(tree: &SyntaxTree, mut id: NodeId) -> NodeId {
    while tree.node(id).kind() == "parenthesized_expression" {
        match tree.node(id).children().first() {
            Some(inner) => id = *inner,
            None => break,
        }
    }
    id
}

/// A function-valued definition found in a source unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub kind: DeclarationKind,
    /// Declared name; `None` for anonymous function declarations
    pub name: Option<String>,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub start_byte: usize,
    pub end_byte: usize,
    /// Identifier of the originating source unit
    pub source_unit: String,
    /// Exact source text of the declaration node
    pub text: String,
}

impl Declaration {
    pub(crate) fn new(
        kind: DeclarationKind,
        name: Option<String>,
        span: Span,
        source_unit: String,
        text: String,
    ) -> Self {
        Self {
            kind,
            name,
            start_line: span.start_line,
            start_column: span.start_column,
            end_line: span.end_line,
            end_column: span.end_column,
            start_byte: span.start_byte,
            end_byte: span.end_byte,
            source_unit,
            text,
        }
    }
}

/// One standalone unit of extracted source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    /// `{sourceUnitStem}_{declarationName}`
    pub name: String,
    pub extension: String,
    pub content: String,
}

impl Artifact {
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.extension)
    }
}
