//! Tree-sitter backed parsing of JavaScript/TypeScript sources.
//!
//! Every script flavour except plain `.ts` goes through the TSX grammar so
//! that JSX is always available. A file whose tree is entirely unusable comes
//! back as a [`SyntaxTree`] with an `Error` root instead of an `Err`, which
//! lets a batch keep going past one bad file.

use tracing::{debug, warn};
use tree_sitter::{Parser, TreeCursor};

use crate::css;
use crate::error::{ParserError, ParserResult};
use crate::languages::{Grammar, SourceLanguage};
use crate::types::{ASTNode, NodeType, ParserWarning, Position, Range, SyntaxTree};

/// Parser for the files the UIR path understands
#[derive(Debug, Default, Clone, Copy)]
pub struct AstParser;

impl AstParser {
    pub fn new() -> Self {
        Self
    }

    /// Whether [`AstParser::parse_file`] accepts this path
    pub fn supports(path: &str) -> bool {
        Grammar::for_path(path).is_some()
    }

    /// Parse any supported file, routing on its extension
    pub fn parse_file(&self, file_path: &str, code: &str) -> ParserResult<SyntaxTree> {
        match Grammar::for_path(file_path) {
            Some(Grammar::CssRegex) => Ok(self.parse_css(code, file_path)),
            Some(grammar) => Ok(self.parse_with_grammar(grammar, code, file_path)),
            None => Err(ParserError::UnsupportedLanguage {
                path: file_path.to_string(),
            }),
        }
    }

    /// Parse JS/JSX/TS/TSX source. Unknown extensions are treated as TSX.
    pub fn parse_javascript(&self, code: &str, file_path: &str) -> SyntaxTree {
        let grammar = match Grammar::for_path(file_path) {
            Some(Grammar::TypeScript) => Grammar::TypeScript,
            _ => Grammar::Tsx,
        };
        self.parse_with_grammar(grammar, code, file_path)
    }

    /// Parse a stylesheet with the class-rule regex
    pub fn parse_css(&self, code: &str, file_path: &str) -> SyntaxTree {
        let tree = css::parse_stylesheet(code, file_path);
        debug!(
            "Parsed {} class rules from {}",
            tree.root.children.len(),
            file_path
        );
        tree
    }

    fn parse_with_grammar(&self, grammar: Grammar, code: &str, file_path: &str) -> SyntaxTree {
        let language = match SourceLanguage::from_path(file_path) {
            Some(SourceLanguage::TypeScript) => SourceLanguage::TypeScript,
            _ => SourceLanguage::JavaScript,
        };

        match parse_tree_sitter(grammar, code) {
            Ok(tree) => {
                let root_node = tree.root_node();
                let mut cursor = tree.walk();
                let root = convert_node(&mut cursor);

                if root_node.has_error() && !has_salvageable_content(&root) {
                    let message = match first_error_position(&root) {
                        Some(pos) => format!("syntax error at {}", pos),
                        None => "syntax error".to_string(),
                    };
                    warn!("Failed to parse {}: {}", file_path, message);
                    return SyntaxTree::new(ASTNode::error(message), code, language, file_path);
                }

                let mut syntax_tree = SyntaxTree::new(root, code, language, file_path);
                if root_node.has_error() {
                    let warning = match first_error_position(&syntax_tree.root) {
                        Some(pos) => ParserWarning::with_position("Parse tree contains errors", pos),
                        None => ParserWarning::new("Parse tree contains errors"),
                    };
                    debug!("{} parsed with recoverable errors", file_path);
                    syntax_tree.add_warning(warning);
                }
                syntax_tree
            }
            Err(e) => {
                warn!("Failed to parse {}: {}", file_path, e);
                SyntaxTree::new(ASTNode::error(e.to_string()), code, language, file_path)
            }
        }
    }
}

fn parse_tree_sitter(grammar: Grammar, code: &str) -> ParserResult<tree_sitter::Tree> {
    let lang: tree_sitter::Language = match grammar {
        Grammar::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        Grammar::Tsx | Grammar::CssRegex => tree_sitter_typescript::LANGUAGE_TSX.into(),
    };
    let mut parser = Parser::new();
    parser
        .set_language(&lang)
        .map_err(|e| ParserError::TreeSitterError {
            message: format!("Failed to set language: {}", e),
        })?;
    parser
        .parse(code, None)
        .ok_or_else(|| ParserError::TreeSitterError {
            message: "Failed to parse source".to_string(),
        })
}

/// Copy a tree-sitter subtree into owned nodes, keeping field names
fn convert_node(cursor: &mut TreeCursor<'_>) -> ASTNode {
    let ts_node = cursor.node();
    let start = ts_node.start_position();
    let end = ts_node.end_position();
    let range = Range::new(
        Position::new(start.row, start.column),
        Position::new(end.row, end.column),
        ts_node.start_byte(),
        ts_node.end_byte(),
    );

    let kind = ts_node.kind();
    let mut node = ASTNode::new(NodeType::from_kind(kind), kind, range);
    node.field = cursor.field_name().map(str::to_string);
    node.named = ts_node.is_named();
    if ts_node.is_missing() {
        node.properties
            .insert("missing".to_string(), serde_json::Value::Bool(true));
    }

    if cursor.goto_first_child() {
        loop {
            node.add_child(convert_node(cursor));
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }

    node
}

/// At least one top-level statement parsed cleanly
fn has_salvageable_content(root: &ASTNode) -> bool {
    root.kind != "ERROR"
        && root
            .named_children()
            .any(|child| child.kind != "ERROR" && child.kind != "comment")
}

fn first_error_position(root: &ASTNode) -> Option<Position> {
    crate::traversal::TraversalUtils::find_first(root, |n| {
        n.kind == "ERROR" || n.properties.contains_key("missing")
    })
    .map(|n| n.range.start)
}
