//! React component recognition over raw lines

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Diagnostic;
use crate::line_parser::common::{self, literal_type};
use crate::line_parser::FileContext;
use crate::scanner::BraceScanner;
use crate::structure::{ComponentDefinition, StateDefinition};

lazy_static! {
    static ref CONST_COMPONENT: Regex = Regex::new(
        r"^(?:export\s+(?:default\s+)?)?(?:const|let)\s+([A-Z]\w*)\s*(?::[^=]+)?=\s*(.*)$"
    )
    .expect("const component regex");
    static ref FUNCTION_COMPONENT: Regex = Regex::new(
        r"^(?:export\s+(?:default\s+)?)?(?:async\s+)?function\s+([A-Z]\w*)\s*[(<]"
    )
    .expect("function component regex");
    static ref CLASS_COMPONENT: Regex = Regex::new(
        r"^(?:export\s+(?:default\s+)?)?class\s+([A-Z]\w*)\s+extends\s+(?:React\.)?(?:Pure)?Component\b"
    )
    .expect("class component regex");
    static ref USE_STATE: Regex = Regex::new(
        r"const\s+\[\s*(\w+)\s*,\s*(\w+)\s*\]\s*=\s*(?:React\.)?useState(?:<[^>]*>)?\(([^)]*)\)"
    )
    .expect("useState regex");
    static ref HOOK_CALL: Regex = Regex::new(r"\b(use[A-Z]\w*)\s*\(").expect("hook regex");
    static ref CLASS_STATE: Regex =
        Regex::new(r"^\s*(?:this\.)?state\s*=\s*\{(.*)$").expect("class state regex");
    static ref STATE_ENTRY: Regex =
        Regex::new(r#"['"]?(\w+)['"]?\s*:\s*([^,}]+)"#).expect("state entry regex");
}

/// Whether the right-hand side of `const X = ...` looks like a component
fn is_component_initialiser(rest: &str) -> bool {
    let rest = rest.trim();
    rest.contains("=>")
        || rest.starts_with("function")
        || rest.contains("memo(")
        || rest.contains("forwardRef(")
        || rest.ends_with('(')
        || rest.ends_with("({")
}

/// A name with at least one lowercase letter; `API_URL` is a constant
fn is_component_name(name: &str) -> bool {
    name.chars().any(|c| c.is_ascii_lowercase())
}

/// Find top-level (unindented) components in a file
pub fn parse_components(ctx: &FileContext<'_>, diagnostics: &mut Vec<Diagnostic>) -> Vec<ComponentDefinition> {
    let lines = &ctx.lines;
    let mut components = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let (name, is_class) = if let Some(caps) = CLASS_COMPONENT.captures(line) {
            (caps[1].to_string(), true)
        } else if let Some(caps) = FUNCTION_COMPONENT.captures(line) {
            (caps[1].to_string(), false)
        } else if let Some(caps) = CONST_COMPONENT.captures(line) {
            if !is_component_initialiser(&caps[2]) {
                continue;
            }
            (caps[1].to_string(), false)
        } else {
            continue;
        };
        if !is_component_name(&name) {
            continue;
        }

        let end = if is_class {
            BraceScanner::find_class_end(lines, idx)
        } else {
            BraceScanner::find_component_end(lines, idx)
        };
        if !end.closed {
            diagnostics.push(
                Diagnostic::warning(
                    ctx.path,
                    format!("block of {} never closes; assumed to run to end of file", name),
                )
                .at_line(idx + 1),
            );
        }

        let block_lines = &lines[idx..=end.line];
        let block = block_lines.join("\n");
        let header = declaration_header(block_lines);

        let props = if is_class { Vec::new() } else { common::destructured_props(&header) };
        let state = if is_class {
            class_state(block_lines)
        } else {
            hook_state(block_lines)
        };
        let hooks = if is_class { Vec::new() } else { extract_hooks(&block) };

        components.push(ComponentDefinition {
            id: ComponentDefinition::make_id(ctx.path, &name, idx + 1),
            component_type: common::classify(is_class, &state, &hooks),
            children: common::extract_children(&block, &name),
            events: common::extract_events(&block),
            props,
            state,
            hooks,
            imports: ctx.imports.clone(),
            exports: ctx.exports.clone(),
            styling: ctx.styling,
            dependencies: ctx.dependencies.clone(),
            metadata: BTreeMap::new(),
            file_path: ctx.path.to_string(),
            line_start: idx + 1,
            line_end: end.line + 1,
            name,
        });
    }

    components
}

fn hook_state(lines: &[&str]) -> Vec<StateDefinition> {
    lines
        .iter()
        .flat_map(|line| USE_STATE.captures_iter(line))
        .map(|caps| {
            let initial = caps[3].trim();
            StateDefinition {
                name: caps[1].to_string(),
                state_type: literal_type(initial).to_string(),
                initial_value: (!initial.is_empty()).then(|| initial.to_string()),
                setter: Some(caps[2].to_string()),
            }
        })
        .collect()
}

/// `state = { a: 1, b: 'x' }`, possibly spread over following lines
fn class_state(lines: &[&str]) -> Vec<StateDefinition> {
    let Some((start, first)) = lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| CLASS_STATE.captures(line).map(|caps| (i, caps[1].to_string())))
    else {
        return Vec::new();
    };

    let mut body = first;
    if !body.contains('}') {
        for line in &lines[start + 1..] {
            body.push(' ');
            body.push_str(line);
            if line.contains('}') {
                break;
            }
        }
    }
    let body = body.split('}').next().unwrap_or_default();

    STATE_ENTRY
        .captures_iter(body)
        .map(|caps| {
            let initial = caps[2].trim();
            StateDefinition {
                name: caps[1].to_string(),
                state_type: literal_type(initial).to_string(),
                initial_value: Some(initial.to_string()),
                setter: None,
            }
        })
        .collect()
}

fn extract_hooks(block: &str) -> Vec<String> {
    let mut hooks: Vec<String> = Vec::new();
    for caps in HOOK_CALL.captures_iter(block) {
        let name = &caps[1];
        if !hooks.iter().any(|h| h == name) {
            hooks.push(name.to_string());
        }
    }
    hooks
}

/// Declaration lines up to the one closing the parameter list
fn declaration_header(lines: &[&str]) -> String {
    let mut header = Vec::new();
    for line in lines {
        header.push(*line);
        if line.contains(')') {
            break;
        }
    }
    header.join(" ")
}
