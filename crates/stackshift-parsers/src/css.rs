//! Regex-based stylesheet extraction.
//!
//! Only `.classname { prop: value; ... }` blocks are recognised. Element,
//! id and attribute selectors, pseudo-classes and at-rule wrappers are
//! ignored; a class rule nested inside `@media` is still picked up because
//! the match does not look at the surrounding text.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::languages::SourceLanguage;
use crate::types::{ASTNode, NodeType, Position, Range, SyntaxTree};

lazy_static! {
    static ref CLASS_RULE: Regex =
        Regex::new(r"\.([A-Za-z_-][A-Za-z0-9_-]*)\s*\{([^}]*)\}").expect("class rule regex");
}

/// One `.class { ... }` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRule {
    pub class_name: String,
    pub declarations: BTreeMap<String, String>,
    pub start_byte: usize,
    pub end_byte: usize,
}

/// Extract every class rule in source order
pub fn extract_class_rules(source: &str) -> Vec<ClassRule> {
    CLASS_RULE
        .captures_iter(source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(ClassRule {
                class_name: caps.get(1)?.as_str().to_string(),
                declarations: parse_declarations(caps.get(2)?.as_str()),
                start_byte: whole.start(),
                end_byte: whole.end(),
            })
        })
        .collect()
}

/// `color: red; margin: 0` → {color: red, margin: 0}
pub fn parse_declarations(block: &str) -> BTreeMap<String, String> {
    block
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim();
            let value = value.trim();
            if prop.is_empty() || value.is_empty() {
                return None;
            }
            Some((prop.to_string(), value.to_string()))
        })
        .collect()
}

/// Build a stylesheet tree: a `Stylesheet` root with one `StyleRule` child per class rule
pub fn parse_stylesheet(source: &str, file_path: &str) -> SyntaxTree {
    let line_index = LineIndex::new(source);
    let mut root = ASTNode::new(
        NodeType::Stylesheet,
        "stylesheet",
        line_index.range(0, source.len()),
    );

    for rule in extract_class_rules(source) {
        let mut node = ASTNode::new(
            NodeType::StyleRule,
            "class_rule",
            line_index.range(rule.start_byte, rule.end_byte),
        );
        node.properties.insert(
            "className".to_string(),
            serde_json::Value::String(rule.class_name),
        );
        let declarations: serde_json::Map<String, serde_json::Value> = rule
            .declarations
            .into_iter()
            .map(|(k, v)| (k, serde_json::Value::String(v)))
            .collect();
        node.properties.insert(
            "declarations".to_string(),
            serde_json::Value::Object(declarations),
        );
        root.add_child(node);
    }

    SyntaxTree::new(root, source, SourceLanguage::Css, file_path)
}

/// Byte offset → line/column lookup
struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    fn position(&self, byte: usize) -> Position {
        let line = match self.line_starts.binary_search(&byte) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Position::new(line, byte - self.line_starts[line])
    }

    fn range(&self, start: usize, end: usize) -> Range {
        Range::new(self.position(start), self.position(end), start, end)
    }
}
