//! Line-parser definitions lifted into UIR so the emitters can consume them

use stackshift_parsers::structure::{ComponentType, PropDefinition, StateDefinition};
use stackshift_parsers::uir::{KEY_HOOKS, KEY_PROPS, KEY_STATE};
use stackshift_parsers::{ComponentDefinition, Literal, PropSpec, StateSpec, UIRNode, UirMetadata, UirNodeType};

/// Read a literal back out of raw source text.
///
/// Only plain strings, numbers and booleans are recognised; anything else
/// (arrays, objects, expressions) yields `None`.
pub fn parse_literal(raw: &str) -> Option<Literal> {
    let raw = raw.trim();
    let mut chars = raw.chars();
    let first = chars.next()?;
    if raw.len() >= 2 && matches!(first, '\'' | '"' | '`') && raw.ends_with(first) {
        return Some(Literal::from_quoted(&raw[1..raw.len() - 1]));
    }
    match raw {
        "true" => return Some(Literal::Boolean(true)),
        "false" => return Some(Literal::Boolean(false)),
        _ => {}
    }
    let numeric_start = first.is_ascii_digit() || matches!(first, '-' | '+' | '.');
    if numeric_start && raw.parse::<f64>().is_ok() {
        return Some(Literal::Number(raw.to_string()));
    }
    None
}

fn prop_spec(prop: &PropDefinition) -> PropSpec {
    PropSpec {
        name: prop.name.clone(),
        prop_type: prop.prop_type.clone(),
        default: prop.default_value.as_deref().and_then(parse_literal),
        required: prop.required,
    }
}

fn state_spec(state: &StateDefinition) -> StateSpec {
    StateSpec {
        name: state.name.clone(),
        setter: state.setter.clone(),
        state_type: state.state_type.clone(),
        initial: state.initial_value.as_deref().and_then(parse_literal),
    }
}

fn component_kind(component_type: ComponentType) -> &'static str {
    match component_type {
        ComponentType::Class => "class",
        ComponentType::Functional | ComponentType::Stateless => "function",
    }
}

/// A `Component` node carrying the definition's props, state, hooks and
/// rendered child tags
pub fn component_to_uir(component: &ComponentDefinition, framework: &str) -> UIRNode {
    let metadata = UirMetadata {
        source_file: component.file_path.clone(),
        source_framework: framework.to_string(),
        line_start: component.line_start,
        line_end: component.line_end,
    };
    let props: Vec<PropSpec> = component.props.iter().map(prop_spec).collect();
    let state: Vec<StateSpec> = component.state.iter().map(state_spec).collect();

    let mut node = UIRNode::new(UirNodeType::Component, &component.name, metadata.clone())
        .with_prop("componentKind", component_kind(component.component_type))
        .with_prop(KEY_PROPS, &props)
        .with_prop(KEY_STATE, &state)
        .with_prop(KEY_HOOKS, &component.hooks);
    node.children = component
        .children
        .iter()
        .map(|tag| UIRNode::new(UirNodeType::Element, tag, metadata.clone()))
        .collect();
    node
}
