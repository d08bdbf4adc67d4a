//! Universal intermediate representation.
//!
//! A deliberately loose node tree sitting between parsed source and emitted
//! target code. Structured data (props, state, hooks) is stored in the
//! `props` map under the `KEY_*` names; the typed accessors on [`UIRNode`]
//! read it back.

pub mod generator;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use generator::UirGenerator;

/// Props map key holding `Vec<PropSpec>` on components
pub const KEY_PROPS: &str = "props";
/// Props map key holding `Vec<StateSpec>` on components
pub const KEY_STATE: &str = "state";
/// Props map key holding `Vec<String>` hook names on components
pub const KEY_HOOKS: &str = "hooks";
/// Props map key holding the parameter names of a function
pub const KEY_PARAMS: &str = "params";
/// Props map key holding raw body text of a function
pub const KEY_BODY: &str = "body";

/// What a UIR node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UirNodeType {
    Component,
    Function,
    Import,
    Export,
    Element,
    Stylesheet,
    StyleRule,
}

impl UirNodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UirNodeType::Component => "component",
            UirNodeType::Function => "function",
            UirNodeType::Import => "import",
            UirNodeType::Export => "export",
            UirNodeType::Element => "element",
            UirNodeType::Stylesheet => "stylesheet",
            UirNodeType::StyleRule => "styleRule",
        }
    }
}

impl std::fmt::Display for UirNodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A literal the emitters know how to re-serialise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Literal {
    String(String),
    /// Raw source text, so `1.0` and `1` stay distinguishable
    Number(String),
    Boolean(bool),
}

impl Literal {
    /// String literal from the text between the quotes, with JS escapes decoded
    pub fn from_quoted(inner: &str) -> Self {
        Literal::String(unescape_js(inner))
    }

    /// Primitive type name of the literal
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::String(_) => "string",
            Literal::Number(_) => "number",
            Literal::Boolean(_) => "boolean",
        }
    }

    pub fn is_fractional(&self) -> bool {
        matches!(self, Literal::Number(raw) if raw.contains('.'))
    }
}

/// Decode the escape sequences of a JS string body. Unknown escapes yield
/// the escaped character; malformed `\x`/`\u` escapes are kept verbatim.
fn unescape_js(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            out.push('\\');
            break;
        };
        match escaped {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            // line continuation
            '\n' => {}
            '\r' => {
                chars.next_if_eq(&'\n');
            }
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, "x", &hex, u32::from_str_radix(&hex, 16).ok());
            }
            'u' if chars.peek() == Some(&'{') => {
                chars.next();
                let hex: String = chars.by_ref().take_while(|&h| h != '}').collect();
                let code = u32::from_str_radix(&hex, 16).ok();
                if code.and_then(char::from_u32).is_some() {
                    push_code_point(&mut out, "u", &hex, code);
                } else {
                    out.push_str("\\u{");
                    out.push_str(&hex);
                    out.push('}');
                }
            }
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                push_code_point(&mut out, "u", &hex, u32::from_str_radix(&hex, 16).ok());
            }
            other => out.push(other),
        }
    }
    out
}

fn push_code_point(out: &mut String, prefix: &str, hex: &str, code: Option<u32>) {
    match code.and_then(char::from_u32) {
        Some(c) => out.push(c),
        None => {
            out.push('\\');
            out.push_str(prefix);
            out.push_str(hex);
        }
    }
}

/// A component input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropSpec {
    pub name: String,
    /// One of `string`, `number`, `boolean`, `array`, `object`, `any`
    pub prop_type: String,
    pub default: Option<Literal>,
    pub required: bool,
}

/// A piece of component state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSpec {
    pub name: String,
    pub setter: Option<String>,
    /// One of `string`, `number`, `boolean`, `any`
    pub state_type: String,
    /// `None` stands for an initialiser that was not a simple literal
    pub initial: Option<Literal>,
}

/// Where a node came from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UirMetadata {
    pub source_file: String,
    pub source_framework: String,
    /// 1-based
    pub line_start: usize,
    /// 1-based
    pub line_end: usize,
}

/// Intermediate node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UIRNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: UirNodeType,
    pub name: String,
    pub props: BTreeMap<String, serde_json::Value>,
    pub children: Vec<UIRNode>,
    pub metadata: UirMetadata,
}

impl UIRNode {
    pub fn new(node_type: UirNodeType, name: impl Into<String>, metadata: UirMetadata) -> Self {
        let name = name.into();
        Self {
            id: Self::make_id(&metadata.source_file, node_type, &name, metadata.line_start),
            node_type,
            name,
            props: BTreeMap::new(),
            children: Vec::new(),
            metadata,
        }
    }

    /// `<file>#<type>:<name>@<line>`
    pub fn make_id(file: &str, node_type: UirNodeType, name: &str, line: usize) -> String {
        format!("{}#{}:{}@{}", file, node_type, name, line)
    }

    pub fn with_prop(mut self, key: &str, value: impl Serialize) -> Self {
        self.set_prop(key, value);
        self
    }

    pub fn set_prop(&mut self, key: &str, value: impl Serialize) {
        // Plain data structures always serialise
        if let Ok(value) = serde_json::to_value(value) {
            self.props.insert(key.to_string(), value);
        }
    }

    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(|v| v.as_str())
    }

    pub fn prop_bool(&self, key: &str) -> bool {
        self.props.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    fn prop_as<T: serde::de::DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.props
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    /// Component inputs
    pub fn prop_specs(&self) -> Vec<PropSpec> {
        self.prop_as(KEY_PROPS)
    }

    /// Component state
    pub fn state_specs(&self) -> Vec<StateSpec> {
        self.prop_as(KEY_STATE)
    }

    pub fn hooks(&self) -> Vec<String> {
        self.prop_as(KEY_HOOKS)
    }

    pub fn params(&self) -> Vec<String> {
        self.prop_as(KEY_PARAMS)
    }

    pub fn is_component(&self) -> bool {
        self.node_type == UirNodeType::Component
    }

    /// First element child, the rendered root of a component
    pub fn root_element(&self) -> Option<&UIRNode> {
        self.children
            .iter()
            .find(|c| c.node_type == UirNodeType::Element)
    }
}
