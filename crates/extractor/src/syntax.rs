//! Owned syntax tree built from a tree-sitter parse.
//!
//! Nodes live in an arena indexed by [`NodeId`]. The tree owns its nodes top
//! down; `parent` is a plain index used for upward lookups only.
//!
//! Grammar-specific node kinds are normalized into [`NodeKind`] at build
//! time so the extractor can match one tagged variant for every language.

use crate::language::LanguageId;
use serde::{Deserialize, Serialize};

/// Index of a node inside its [`SyntaxTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Zero-based row/column position (column in bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl From<tree_sitter::Point> for Point {
    fn from(point: tree_sitter::Point) -> Self {
        Self {
            row: point.row,
            column: point.column,
        }
    }
}

/// Language-independent node classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    FunctionDeclaration,
    FunctionExpression,
    ArrowFunction,
    MethodDefinition,
    FunctionSignature,
    ClassDeclaration,
    VariableDeclaration,
    VariableDeclarator,
    /// Declaration that binds its own name (Rust `let`, `const`, `static`)
    BindingDeclaration,
    InterfaceDeclaration,
    TypeAliasDeclaration,
    ModuleDeclaration,
    ImportStatement,
    ExportStatement,
    ExportClause,
    ExportSpecifier,
    CallExpression,
    MemberExpression,
    NewExpression,
    ClassHeritage,
    ExtendsClause,
    AssignmentExpression,
    TypeIdentifier,
    TypeAnnotation,
    TypeArguments,
    TypeParameter,
    Identifier,
    PropertyIdentifier,
    StringLiteral,
    ModulePath,
    Visibility,
    /// Expression wrapper that is transparent for naming (parentheses, casts,
    /// turbofish callees)
    Wrapper,
    /// Error-recovery node; children are still best-effort syntax
    Error,
    /// Zero-width node inserted by error recovery
    Missing,
    Other,
}

impl NodeKind {
    /// Whether this kind declares a function-like construct
    pub fn is_function_like(self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration
                | NodeKind::FunctionExpression
                | NodeKind::ArrowFunction
                | NodeKind::MethodDefinition
                | NodeKind::FunctionSignature
        )
    }

    /// Normalize a grammar node kind for `language`
    pub fn classify(language: LanguageId, raw_kind: &str, field: Option<&str>) -> Self {
        match language {
            LanguageId::JavaScript | LanguageId::TypeScript | LanguageId::Tsx => {
                ecmascript_kind(raw_kind)
            }
            LanguageId::Python => python_kind(raw_kind, field),
            LanguageId::Rust => rust_kind(raw_kind),
            _ => NodeKind::Other,
        }
    }
}

fn ecmascript_kind(raw_kind: &str) -> NodeKind {
    match raw_kind {
        "program" => NodeKind::Program,
        "function_declaration" | "generator_function_declaration" => NodeKind::FunctionDeclaration,
        "function_expression" | "function" | "generator_function" => NodeKind::FunctionExpression,
        "arrow_function" => NodeKind::ArrowFunction,
        "method_definition" => NodeKind::MethodDefinition,
        "function_signature" => NodeKind::FunctionSignature,
        "class_declaration" | "abstract_class_declaration" => NodeKind::ClassDeclaration,
        "variable_declaration" | "lexical_declaration" => NodeKind::VariableDeclaration,
        "variable_declarator" => NodeKind::VariableDeclarator,
        "interface_declaration" => NodeKind::InterfaceDeclaration,
        "type_alias_declaration" => NodeKind::TypeAliasDeclaration,
        "import_statement" => NodeKind::ImportStatement,
        "export_statement" => NodeKind::ExportStatement,
        "export_clause" => NodeKind::ExportClause,
        "export_specifier" => NodeKind::ExportSpecifier,
        "call_expression" => NodeKind::CallExpression,
        "member_expression" => NodeKind::MemberExpression,
        "new_expression" => NodeKind::NewExpression,
        "class_heritage" => NodeKind::ClassHeritage,
        "extends_clause" => NodeKind::ExtendsClause,
        "assignment_expression" => NodeKind::AssignmentExpression,
        "type_identifier" => NodeKind::TypeIdentifier,
        "type_annotation"
        | "opting_type_annotation"
        | "omitting_type_annotation"
        | "adding_type_annotation" => NodeKind::TypeAnnotation,
        "type_arguments" => NodeKind::TypeArguments,
        "type_parameter" => NodeKind::TypeParameter,
        "identifier" => NodeKind::Identifier,
        "property_identifier" | "private_property_identifier" => NodeKind::PropertyIdentifier,
        "string" => NodeKind::StringLiteral,
        "parenthesized_expression"
        | "as_expression"
        | "satisfies_expression"
        | "non_null_expression"
        | "type_assertion" => NodeKind::Wrapper,
        _ => NodeKind::Other,
    }
}

fn python_kind(raw_kind: &str, field: Option<&str>) -> NodeKind {
    match (raw_kind, field) {
        ("argument_list", Some("superclasses")) => NodeKind::ClassHeritage,
        ("module", _) => NodeKind::Program,
        ("function_definition", _) => NodeKind::FunctionDeclaration,
        ("lambda", _) => NodeKind::FunctionExpression,
        ("class_definition", _) => NodeKind::ClassDeclaration,
        ("assignment", _) => NodeKind::AssignmentExpression,
        ("import_statement" | "import_from_statement", _) => NodeKind::ImportStatement,
        ("dotted_name" | "relative_import", _) => NodeKind::ModulePath,
        ("call", _) => NodeKind::CallExpression,
        ("attribute", _) => NodeKind::MemberExpression,
        ("identifier", _) => NodeKind::Identifier,
        ("string", _) => NodeKind::StringLiteral,
        ("parenthesized_expression", _) => NodeKind::Wrapper,
        _ => NodeKind::Other,
    }
}

fn rust_kind(raw_kind: &str) -> NodeKind {
    match raw_kind {
        "source_file" => NodeKind::Program,
        "function_item" => NodeKind::FunctionDeclaration,
        "function_signature_item" => NodeKind::FunctionSignature,
        "closure_expression" => NodeKind::ArrowFunction,
        "struct_item" | "enum_item" | "union_item" => NodeKind::ClassDeclaration,
        "trait_item" => NodeKind::InterfaceDeclaration,
        "type_item" => NodeKind::TypeAliasDeclaration,
        "let_declaration" | "const_item" | "static_item" => NodeKind::BindingDeclaration,
        "mod_item" => NodeKind::ModuleDeclaration,
        "use_declaration" => NodeKind::ImportStatement,
        "assignment_expression" => NodeKind::AssignmentExpression,
        "call_expression" => NodeKind::CallExpression,
        "field_expression" | "scoped_identifier" | "scoped_type_identifier" => {
            NodeKind::MemberExpression
        }
        "field_identifier" => NodeKind::PropertyIdentifier,
        "struct_expression" => NodeKind::NewExpression,
        "type_identifier" => NodeKind::TypeIdentifier,
        "type_arguments" => NodeKind::TypeArguments,
        "type_parameters" | "type_parameter" | "constrained_type_parameter"
        | "optional_type_parameter" => NodeKind::TypeParameter,
        "identifier" => NodeKind::Identifier,
        "string_literal" => NodeKind::StringLiteral,
        "visibility_modifier" => NodeKind::Visibility,
        "parenthesized_expression" | "type_cast_expression" | "generic_function" => {
            NodeKind::Wrapper
        }
        _ => NodeKind::Other,
    }
}

/// One node of a [`SyntaxTree`]
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Kind name as the grammar spells it
    pub raw_kind: &'static str,
    /// Field this node occupies in its parent, if any
    pub field: Option<&'static str>,
    pub named: bool,
    pub start_byte: usize,
    pub end_byte: usize,
    pub start: Point,
    pub end: Point,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Arena tree over a borrowed source text
#[derive(Debug, Clone)]
pub struct SyntaxTree<'src> {
    language: LanguageId,
    source: &'src str,
    nodes: Vec<SyntaxNode>,
    has_errors: bool,
}

impl<'src> SyntaxTree<'src> {
    /// Convert a tree-sitter tree, walking it once with a cursor
    pub(crate) fn from_tree_sitter(
        tree: &tree_sitter::Tree,
        source: &'src str,
        language: LanguageId,
    ) -> Self {
        let mut nodes: Vec<SyntaxNode> = Vec::new();
        let mut ancestors: Vec<NodeId> = Vec::new();
        let mut cursor = tree.walk();

        loop {
            let node = cursor.node();
            let field = cursor.field_name();
            let id = NodeId(nodes.len());
            let parent = ancestors.last().copied();

            let kind = if node.is_missing() {
                NodeKind::Missing
            } else if node.is_error() {
                NodeKind::Error
            } else {
                NodeKind::classify(language, node.kind(), field)
            };

            nodes.push(SyntaxNode {
                kind,
                raw_kind: node.kind(),
                field,
                named: node.is_named(),
                start_byte: node.start_byte(),
                end_byte: node.end_byte(),
                start: node.start_position().into(),
                end: node.end_position().into(),
                parent,
                children: Vec::new(),
            });
            if let Some(parent) = parent {
                nodes[parent.0].children.push(id);
            }

            if cursor.goto_first_child() {
                ancestors.push(id);
                continue;
            }

            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return Self {
                        language,
                        source,
                        nodes,
                        has_errors: tree.root_node().has_error(),
                    };
                }
                ancestors.pop();
            }
        }
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Whether error recovery was needed anywhere in the tree
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Source text covered by a node
    pub fn text(&self, id: NodeId) -> &'src str {
        let node = &self.nodes[id.0];
        self.source.get(node.start_byte..node.end_byte).unwrap_or("")
    }

    /// First child of the given kind
    pub fn first_child_of(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.kind(child) == kind)
    }

    /// First child occupying the given grammar field
    pub fn child_by_field(&self, id: NodeId, field: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.nodes[child.0].field == Some(field))
    }

    /// Ancestors from the parent up to the root
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, 'src> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Depth-first pre-order walk over every node
    pub fn preorder(&self) -> Preorder<'_, 'src> {
        let stack = if self.nodes.is_empty() {
            Vec::new()
        } else {
            vec![self.root()]
        };
        Preorder { tree: self, stack }
    }

    /// First node of `kind` in the subtree below `id`, in pre-order
    pub fn first_descendant_of(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self.kind(current) == kind {
                return Some(current);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        None
    }
}

pub struct Ancestors<'t, 'src> {
    tree: &'t SyntaxTree<'src>,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_, '_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

pub struct Preorder<'t, 'src> {
    tree: &'t SyntaxTree<'src>,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_, '_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(current).iter().rev().copied());
        Some(current)
    }
}
