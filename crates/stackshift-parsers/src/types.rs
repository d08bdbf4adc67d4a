//! Syntax tree types shared by the AST and CSS parsers

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::languages::SourceLanguage;

/// Position in source code (0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1) // 1-based for display
    }
}

/// Range in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
    pub start_byte: usize,
    pub end_byte: usize,
}

impl Range {
    pub fn new(start: Position, end: Position, start_byte: usize, end_byte: usize) -> Self {
        Self {
            start,
            end,
            start_byte,
            end_byte,
        }
    }

    /// 1-based first line
    pub fn line_start(&self) -> usize {
        self.start.line + 1
    }

    /// 1-based last line
    pub fn line_end(&self) -> usize {
        self.end.line + 1
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Coarse node categories
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Program,
    Function,
    Class,
    Variable,
    Import,
    Export,
    CallExpression,
    Return,
    StringLiteral,
    NumberLiteral,
    BooleanLiteral,
    ArrayLiteral,
    ObjectLiteral,
    JsxElement,
    Comment,
    Stylesheet,
    StyleRule,
    /// The file could not be parsed at all
    Error,
    Custom(String),
}

impl NodeType {
    /// Map a tree-sitter node kind onto a category
    pub fn from_kind(kind: &str) -> Self {
        match kind {
            "program" => NodeType::Program,
            "function_declaration" | "function_expression" | "function" | "arrow_function"
            | "method_definition" | "generator_function_declaration" => NodeType::Function,
            "class_declaration" | "class" | "abstract_class_declaration" => NodeType::Class,
            "lexical_declaration" | "variable_declaration" => NodeType::Variable,
            "import_statement" => NodeType::Import,
            "export_statement" => NodeType::Export,
            "call_expression" => NodeType::CallExpression,
            "return_statement" => NodeType::Return,
            "string" | "template_string" => NodeType::StringLiteral,
            "number" => NodeType::NumberLiteral,
            "true" | "false" => NodeType::BooleanLiteral,
            "array" => NodeType::ArrayLiteral,
            "object" => NodeType::ObjectLiteral,
            "jsx_element" | "jsx_self_closing_element" | "jsx_fragment" => NodeType::JsxElement,
            "comment" => NodeType::Comment,
            other => NodeType::Custom(other.to_string()),
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeType::Program => write!(f, "program"),
            NodeType::Function => write!(f, "function"),
            NodeType::Class => write!(f, "class"),
            NodeType::Variable => write!(f, "variable"),
            NodeType::Import => write!(f, "import"),
            NodeType::Export => write!(f, "export"),
            NodeType::CallExpression => write!(f, "call_expression"),
            NodeType::Return => write!(f, "return"),
            NodeType::StringLiteral => write!(f, "string_literal"),
            NodeType::NumberLiteral => write!(f, "number_literal"),
            NodeType::BooleanLiteral => write!(f, "boolean_literal"),
            NodeType::ArrayLiteral => write!(f, "array_literal"),
            NodeType::ObjectLiteral => write!(f, "object_literal"),
            NodeType::JsxElement => write!(f, "jsx_element"),
            NodeType::Comment => write!(f, "comment"),
            NodeType::Stylesheet => write!(f, "stylesheet"),
            NodeType::StyleRule => write!(f, "style_rule"),
            NodeType::Error => write!(f, "Error"),
            NodeType::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Owned syntax tree node.
///
/// Node text is not stored; slice it out of the owning [`SyntaxTree`]'s
/// source with [`ASTNode::text`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ASTNode {
    pub node_type: NodeType,
    /// Raw grammar kind, e.g. `variable_declarator`
    pub kind: String,
    /// Field name this node occupies in its parent, e.g. `name`
    pub field: Option<String>,
    /// Whether the grammar names this node (punctuation and keywords are anonymous)
    pub named: bool,
    pub range: Range,
    pub children: Vec<ASTNode>,
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl ASTNode {
    pub fn new(node_type: NodeType, kind: impl Into<String>, range: Range) -> Self {
        Self {
            node_type,
            kind: kind.into(),
            field: None,
            named: true,
            range,
            children: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    /// An error root carrying the failure message
    pub fn error(message: impl Into<String>) -> Self {
        let mut node = Self::new(NodeType::Error, "Error", Range::default());
        node.properties
            .insert("message".to_string(), serde_json::Value::String(message.into()));
        node
    }

    pub fn add_child(&mut self, child: ASTNode) {
        self.children.push(child);
    }

    pub fn is_error(&self) -> bool {
        self.node_type == NodeType::Error
    }

    /// Source text covered by this node
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source
            .get(self.range.start_byte..self.range.end_byte)
            .unwrap_or("")
    }

    /// First child occupying the given field
    pub fn child_by_field(&self, field: &str) -> Option<&ASTNode> {
        self.children
            .iter()
            .find(|child| child.field.as_deref() == Some(field))
    }

    /// All children occupying the given field
    pub fn children_by_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ASTNode> + 'a {
        self.children
            .iter()
            .filter(move |child| child.field.as_deref() == Some(field))
    }

    /// Named children only
    pub fn named_children(&self) -> impl Iterator<Item = &ASTNode> {
        self.children.iter().filter(|child| child.named)
    }

    /// First named child of a grammar kind
    pub fn first_child_of_kind(&self, kind: &str) -> Option<&ASTNode> {
        self.children.iter().find(|child| child.kind == kind)
    }

    /// Whether an anonymous token such as `default` appears among the children
    pub fn has_token(&self, token: &str) -> bool {
        self.children.iter().any(|child| !child.named && child.kind == token)
    }

    /// All descendant nodes (depth-first, source order)
    pub fn descendants(&self) -> Vec<&ASTNode> {
        let mut result = Vec::new();
        self.collect_descendants(&mut result);
        result
    }

    fn collect_descendants<'a>(&'a self, result: &mut Vec<&'a ASTNode>) {
        for child in &self.children {
            result.push(child);
            child.collect_descendants(result);
        }
    }

    /// Find nodes by category
    pub fn find_by_type(&self, node_type: &NodeType) -> Vec<&ASTNode> {
        let mut result = Vec::new();
        if &self.node_type == node_type {
            result.push(self);
        }
        for child in &self.children {
            result.extend(child.find_by_type(node_type));
        }
        result
    }

    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Warning attached to a tree that parsed with recoverable problems
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserWarning {
    pub message: String,
    pub position: Option<Position>,
}

impl ParserWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }

    pub fn with_position(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position: Some(position),
        }
    }
}

/// Parsed syntax tree together with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntaxTree {
    pub root: ASTNode,
    pub source: String,
    pub language: SourceLanguage,
    pub file_path: String,
    pub warnings: Vec<ParserWarning>,
}

impl SyntaxTree {
    pub fn new(root: ASTNode, source: impl Into<String>, language: SourceLanguage, file_path: impl Into<String>) -> Self {
        Self {
            root,
            source: source.into(),
            language,
            file_path: file_path.into(),
            warnings: Vec::new(),
        }
    }

    pub fn add_warning(&mut self, warning: ParserWarning) {
        self.warnings.push(warning);
    }

    /// Whether the file failed to parse
    pub fn is_error(&self) -> bool {
        self.root.is_error()
    }

    /// Failure message of an error tree
    pub fn error_message(&self) -> Option<&str> {
        if !self.is_error() {
            return None;
        }
        self.root.properties.get("message").and_then(|v| v.as_str())
    }

    /// Source text of a node in this tree
    pub fn text(&self, node: &ASTNode) -> &str {
        node.text(&self.source)
    }

    pub fn find_nodes(&self, node_type: &NodeType) -> Vec<&ASTNode> {
        self.root.find_by_type(node_type)
    }
}
