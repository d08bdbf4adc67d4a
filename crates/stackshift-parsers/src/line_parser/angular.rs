//! Angular component recognition.
//!
//! A component starts at a line containing `@Component` and its class is the
//! next line containing `class `. The class body is brace-scanned from there.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Diagnostic;
use crate::line_parser::common::{annotation_type, literal_type};
use crate::line_parser::FileContext;
use crate::scanner::BraceScanner;
use crate::structure::{
    ComponentDefinition, ComponentType, EventDefinition, PropDefinition, StateDefinition,
};

lazy_static! {
    static ref CLASS_NAME: Regex = Regex::new(r"class\s+(\w+)").expect("class name regex");
    static ref SELECTOR: Regex =
        Regex::new(r#"selector:\s*['"]([^'"]+)['"]"#).expect("selector regex");
    static ref TEMPLATE_URL: Regex =
        Regex::new(r#"templateUrl:\s*['"]([^'"]+)['"]"#).expect("templateUrl regex");
    static ref INPUT: Regex = Regex::new(
        r"@Input\([^)]*\)\s*(?:set\s+)?(\w+)(\?|!)?\s*(?::\s*([^=;]+?))?\s*(?:=\s*([^;]+))?;?\s*$"
    )
    .expect("input regex");
    static ref OUTPUT: Regex = Regex::new(r"@Output\([^)]*\)\s*(\w+)").expect("output regex");
    static ref FIELD: Regex = Regex::new(
        r"^\s*(?:(?:public|private|protected|readonly)\s+)*(\w+)\s*(?::\s*([^=;]+?))?\s*=\s*([^;]+);?\s*$"
    )
    .expect("field regex");
    static ref LIFECYCLE: Regex = Regex::new(
        r"^\s*(ng(?:OnInit|OnChanges|DoCheck|AfterContentInit|AfterContentChecked|AfterViewInit|AfterViewChecked|OnDestroy))\s*\("
    )
    .expect("lifecycle regex");
    static ref INLINE_TEMPLATE: Regex = Regex::new(r"template:\s*`([^`]*)`").expect("template regex");
    static ref ELEMENT_TAG: Regex = Regex::new(r"<(app-[a-z0-9-]+)").expect("element tag regex");
    static ref EVENT_BINDING: Regex =
        Regex::new(r#"\((\w+)\)="([^"]*)""#).expect("event binding regex");
}

pub fn parse_components(ctx: &FileContext<'_>, diagnostics: &mut Vec<Diagnostic>) -> Vec<ComponentDefinition> {
    let lines = &ctx.lines;
    let mut components = Vec::new();
    let mut search_from = 0;

    while let Some(offset) = lines[search_from..].iter().position(|l| l.contains("@Component")) {
        let decorator = search_from + offset;
        let Some(class_offset) = lines[decorator..].iter().position(|l| l.contains("class ")) else {
            diagnostics.push(
                Diagnostic::warning(ctx.path, "@Component without a following class")
                    .at_line(decorator + 1),
            );
            break;
        };
        let class_line = decorator + class_offset;
        let Some(name) = CLASS_NAME.captures(lines[class_line]).map(|c| c[1].to_string()) else {
            search_from = class_line + 1;
            continue;
        };

        let end = BraceScanner::find_class_end(lines, class_line);
        if !end.closed {
            diagnostics.push(
                Diagnostic::warning(
                    ctx.path,
                    format!("class {} never closes; assumed to run to end of file", name),
                )
                .at_line(class_line + 1),
            );
        }

        let decorator_text = lines[decorator..class_line].join("\n");
        let body = &lines[class_line..=end.line];
        components.push(component(ctx, &name, decorator, end.line, &decorator_text, body));
        search_from = end.line + 1;
        if search_from >= lines.len() {
            break;
        }
    }

    components
}

fn component(
    ctx: &FileContext<'_>,
    name: &str,
    start: usize,
    end: usize,
    decorator: &str,
    body: &[&str],
) -> ComponentDefinition {
    let mut props = Vec::new();
    let mut events = Vec::new();
    let mut state = Vec::new();
    let mut hooks = Vec::new();
    let mut depth: i64 = 0;

    for line in body {
        if depth == 1 {
            if let Some(caps) = INPUT.captures(line) {
                let default = caps.get(4).map(|m| m.as_str().trim().to_string());
                let prop_type = match caps.get(3) {
                    Some(t) => annotation_type(t.as_str()),
                    None => default.as_deref().map(literal_type).unwrap_or("any"),
                };
                props.push(PropDefinition {
                    name: caps[1].to_string(),
                    prop_type: prop_type.to_string(),
                    required: caps.get(2).is_some_and(|m| m.as_str() == "!"),
                    default_value: default,
                });
            } else if let Some(caps) = OUTPUT.captures(line) {
                events.push(EventDefinition {
                    name: caps[1].to_string(),
                    handler: None,
                });
            } else if let Some(caps) = LIFECYCLE.captures(line) {
                hooks.push(caps[1].to_string());
            } else if let Some(caps) = FIELD.captures(line) {
                let initial = caps[3].trim().to_string();
                let state_type = match caps.get(2) {
                    Some(t) => annotation_type(t.as_str()),
                    None => literal_type(&initial),
                };
                state.push(StateDefinition {
                    name: caps[1].to_string(),
                    state_type: state_type.to_string(),
                    initial_value: Some(initial),
                    setter: None,
                });
            }
        }
        depth += line.matches('{').count() as i64 - line.matches('}').count() as i64;
    }

    let template = INLINE_TEMPLATE
        .captures(decorator)
        .map(|c| c[1].to_string())
        .unwrap_or_default();
    for caps in EVENT_BINDING.captures_iter(&template) {
        let handler = caps[2].split('(').next().unwrap_or_default().trim().to_string();
        if !handler.is_empty() && !events.iter().any(|e: &EventDefinition| e.handler.as_ref() == Some(&handler)) {
            events.push(EventDefinition {
                name: caps[1].to_string(),
                handler: Some(handler),
            });
        }
    }
    let mut children: Vec<String> = Vec::new();
    for caps in ELEMENT_TAG.captures_iter(&template) {
        let tag = caps[1].to_string();
        if !children.contains(&tag) {
            children.push(tag);
        }
    }

    let mut metadata = BTreeMap::new();
    if let Some(caps) = SELECTOR.captures(decorator) {
        metadata.insert("selector".to_string(), caps[1].to_string());
    }
    if let Some(caps) = TEMPLATE_URL.captures(decorator) {
        metadata.insert("templateUrl".to_string(), caps[1].to_string());
    }

    ComponentDefinition {
        id: ComponentDefinition::make_id(ctx.path, name, start + 1),
        name: name.to_string(),
        file_path: ctx.path.to_string(),
        line_start: start + 1,
        line_end: end + 1,
        component_type: ComponentType::Class,
        props,
        state,
        hooks,
        imports: ctx.imports.clone(),
        exports: ctx.exports.clone(),
        events,
        children,
        styling: ctx.styling,
        dependencies: ctx.dependencies.clone(),
        metadata,
    }
}
