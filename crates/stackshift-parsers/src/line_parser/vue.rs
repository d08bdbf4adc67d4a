//! Vue single-file component recognition.
//!
//! Sections are found by the first line holding a start tag and the first
//! later line holding the matching end tag. There is no nesting awareness:
//! an inner `<template v-if>` or a `</script>` inside a comment ends the
//! section early.

use std::collections::BTreeMap;

use heck::ToUpperCamelCase;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Diagnostic;
use crate::line_parser::common::{self, annotation_type, literal_type};
use crate::line_parser::FileContext;
use crate::scanner::BraceScanner;
use crate::structure::{ComponentDefinition, EventDefinition, PropDefinition, StateDefinition};

lazy_static! {
    static ref NAME_OPTION: Regex = Regex::new(r#"name:\s*['"]([^'"]+)['"]"#).expect("name regex");
    static ref PROPS_ARRAY: Regex = Regex::new(r"props:\s*\[([^\]]*)\]").expect("props array regex");
    static ref PROPS_OBJECT: Regex = Regex::new(r"^\s*props:\s*\{").expect("props object regex");
    static ref DEFINE_PROPS: Regex = Regex::new(r"defineProps").expect("defineProps regex");
    static ref TYPED_KEY: Regex = Regex::new(r"(\w+)(\?)?\s*:\s*([\w\[\]<>]+)").expect("typed key regex");
    static ref OBJECT_KEY: Regex = Regex::new(r"^\s*(\w+)\s*:\s*(.*?),?\s*$").expect("object key regex");
    static ref QUOTED: Regex = Regex::new(r#"['"]([^'"]+)['"]"#).expect("quoted regex");
    static ref DATA_FN: Regex = Regex::new(r"^\s*data\s*\(\s*\)\s*\{").expect("data regex");
    static ref REF_BINDING: Regex = Regex::new(
        r"(?:const|let)\s+(\w+)\s*=\s*(ref|reactive)(?:<[^>]*>)?\(([^)]*)\)"
    )
    .expect("ref regex");
    static ref EMIT: Regex = Regex::new(r#"\$?emit\(\s*['"]([\w:-]+)['"]"#).expect("emit regex");
    static ref COMPOSITION_HOOK: Regex = Regex::new(
        r"\b(onMounted|onBeforeMount|onUpdated|onBeforeUpdate|onUnmounted|onBeforeUnmount|watch|watchEffect|computed)\s*\("
    )
    .expect("composition hook regex");
    static ref OPTIONS_HOOK: Regex = Regex::new(
        r"^\s*(beforeCreate|created|beforeMount|mounted|beforeUpdate|updated|beforeUnmount|unmounted|beforeDestroy|destroyed)\s*\(\s*\)\s*\{"
    )
    .expect("options hook regex");
    static ref KEBAB_TAG: Regex = Regex::new(r"<([a-z][a-z0-9]*(?:-[a-z0-9]+)+)").expect("kebab tag regex");
}

/// A section located by its first start tag and first following end tag (0-based lines)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub start: usize,
    pub end: usize,
    pub closed: bool,
}

/// Locate `<tag ...>` .. `</tag>`
pub fn find_section(lines: &[&str], tag: &str) -> Option<Section> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);
    let start = lines.iter().position(|line| {
        line.trim_start()
            .strip_prefix(&open)
            .is_some_and(|rest| rest.starts_with('>') || rest.starts_with(' '))
    })?;
    match lines[start..].iter().position(|line| line.contains(&close)) {
        Some(offset) => Some(Section {
            start,
            end: start + offset,
            closed: true,
        }),
        None => Some(Section {
            start,
            end: lines.len().saturating_sub(1),
            closed: false,
        }),
    }
}

pub fn parse_components(ctx: &FileContext<'_>, diagnostics: &mut Vec<Diagnostic>) -> Vec<ComponentDefinition> {
    let lines = &ctx.lines;
    let script = find_section(lines, "script");
    let template = find_section(lines, "template");

    for (section, tag) in [(script, "script"), (template, "template")] {
        if let Some(section) = section.filter(|s| !s.closed) {
            diagnostics.push(
                Diagnostic::warning(ctx.path, format!("<{}> section is never closed", tag))
                    .at_line(section.start + 1),
            );
        }
    }

    let (line_start, line_end) = match (script, template) {
        (Some(s), Some(t)) => (s.start.min(t.start), s.end.max(t.end)),
        (Some(s), None) => (s.start, s.end),
        (None, Some(t)) => (t.start, t.end),
        (None, None) => {
            diagnostics.push(Diagnostic::warning(
                ctx.path,
                "no <script> or <template> section found",
            ));
            return Vec::new();
        }
    };

    let script_lines: &[&str] = script.map(|s| &lines[s.start..=s.end]).unwrap_or_default();
    let template_text = template
        .map(|t| lines[t.start..=t.end].join("\n"))
        .unwrap_or_default();
    let script_text = script_lines.join("\n");

    let name = NAME_OPTION
        .captures(&script_text)
        .map(|caps| caps[1].to_upper_camel_case())
        .unwrap_or_else(|| common::component_name_from_path(ctx.path));

    let props = props(script_lines);
    let state = state(script_lines);
    let hooks = hooks(script_lines);
    let events = events(&script_text, &template_text);

    let mut children = common::extract_children(&template_text, &name);
    for caps in KEBAB_TAG.captures_iter(&template_text) {
        let tag = caps[1].to_upper_camel_case();
        if tag != name && !children.contains(&tag) {
            children.push(tag);
        }
    }

    vec![ComponentDefinition {
        id: ComponentDefinition::make_id(ctx.path, &name, line_start + 1),
        component_type: common::classify(false, &state, &hooks),
        props,
        state,
        hooks,
        events,
        children,
        imports: ctx.imports.clone(),
        exports: ctx.exports.clone(),
        styling: ctx.styling,
        dependencies: ctx.dependencies.clone(),
        metadata: BTreeMap::new(),
        file_path: ctx.path.to_string(),
        line_start: line_start + 1,
        line_end: line_end + 1,
        name,
    }]
}

fn props(script: &[&str]) -> Vec<PropDefinition> {
    let text = script.join("\n");

    if let Some(caps) = PROPS_ARRAY.captures(&text) {
        return QUOTED
            .captures_iter(&caps[1])
            .map(|q| PropDefinition {
                name: q[1].to_string(),
                prop_type: "any".to_string(),
                required: false,
                default_value: None,
            })
            .collect();
    }

    if let Some(idx) = script.iter().position(|l| PROPS_OBJECT.is_match(l)) {
        return top_level_keys(script, idx)
            .into_iter()
            .map(|(name, value)| {
                // `title: String` or `title: { type: String, required: true }`
                let ty = value
                    .split("type:")
                    .nth(1)
                    .unwrap_or(&value)
                    .trim_start()
                    .split(|c: char| !c.is_alphanumeric())
                    .next()
                    .unwrap_or_default()
                    .to_string();
                PropDefinition {
                    name,
                    prop_type: annotation_type(&ty).to_string(),
                    required: value.contains("required: true"),
                    default_value: None,
                }
            })
            .collect();
    }

    if let Some(idx) = script.iter().position(|l| DEFINE_PROPS.is_match(l)) {
        // defineProps<{ a: string }>() or defineProps({ a: String }), up to the closing paren line
        let mut call = String::new();
        for line in &script[idx..] {
            call.push_str(line);
            call.push('\n');
            if line.contains(')') {
                break;
            }
        }
        let call = call.split_once("defineProps").map(|(_, rest)| rest).unwrap_or_default();
        return TYPED_KEY
            .captures_iter(call)
            .map(|caps| PropDefinition {
                name: caps[1].to_string(),
                prop_type: annotation_type(&caps[3]).to_string(),
                required: caps.get(2).is_none(),
                default_value: None,
            })
            .collect();
    }

    Vec::new()
}

fn state(script: &[&str]) -> Vec<StateDefinition> {
    let mut state = Vec::new();

    if let Some(idx) = script.iter().position(|l| DATA_FN.is_match(l)) {
        if let Some(ret) = script[idx..].iter().position(|l| l.contains("return {")) {
            for (name, value) in top_level_keys(script, idx + ret) {
                state.push(StateDefinition {
                    state_type: literal_type(&value).to_string(),
                    initial_value: Some(value),
                    setter: None,
                    name,
                });
            }
        }
    }

    for caps in script.iter().flat_map(|l| REF_BINDING.captures_iter(l)) {
        let initial = caps[3].trim();
        state.push(StateDefinition {
            name: caps[1].to_string(),
            state_type: if &caps[2] == "reactive" {
                "object".to_string()
            } else {
                literal_type(initial).to_string()
            },
            initial_value: (!initial.is_empty()).then(|| initial.to_string()),
            setter: None,
        });
    }

    state
}

fn hooks(script: &[&str]) -> Vec<String> {
    let mut hooks: Vec<String> = Vec::new();
    for line in script {
        let found = COMPOSITION_HOOK
            .captures_iter(line)
            .map(|c| c[1].to_string())
            .chain(OPTIONS_HOOK.captures(line).map(|c| c[1].to_string()));
        for hook in found {
            if !hooks.contains(&hook) {
                hooks.push(hook);
            }
        }
    }
    hooks
}

fn events(script: &str, template: &str) -> Vec<EventDefinition> {
    let mut events: Vec<EventDefinition> = Vec::new();
    for caps in EMIT.captures_iter(script).chain(EMIT.captures_iter(template)) {
        let name = caps[1].to_string();
        if !events.iter().any(|e| e.name == name) {
            events.push(EventDefinition { name, handler: None });
        }
    }
    events
}

/// `key: value` entries one level inside the brace block opening on `start`
fn top_level_keys(lines: &[&str], start: usize) -> Vec<(String, String)> {
    let end = BraceScanner::find_class_end(lines, start).line;
    let mut depth: i64 = 0;
    let mut keys = Vec::new();
    for line in &lines[start..=end] {
        if depth == 1 {
            if let Some(caps) = OBJECT_KEY.captures(line) {
                keys.push((caps[1].to_string(), caps[2].trim().to_string()));
            }
        }
        depth += line.matches('{').count() as i64 - line.matches('}').count() as i64;
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::ComponentType;

    fn parse(path: &str, src: &str) -> (Vec<ComponentDefinition>, Vec<Diagnostic>) {
        let ctx = FileContext::new(path, src);
        let mut diagnostics = Vec::new();
        let components = parse_components(&ctx, &mut diagnostics);
        (components, diagnostics)
    }

    const OPTIONS_SFC: &str = r#"<template>
  <div class="todo">
    <TodoItem v-for="t in todos" :key="t.id" @click="$emit('select', t)" />
    <base-button>Add</base-button>
  </div>
</template>

<script>
export default {
  name: 'todo-list',
  props: {
    title: String,
    limit: { type: Number, required: true }
  },
  data() {
    return {
      todos: [],
      filter: 'all'
    }
  },
  mounted() {
    this.$emit('ready')
  }
}
</script>
"#;

    #[test]
    fn test_options_api_component() {
        let (components, diagnostics) = parse("src/components/TodoList.vue", OPTIONS_SFC);
        assert!(diagnostics.is_empty());
        let todo = &components[0];
        assert_eq!(todo.name, "TodoList");
        assert_eq!(todo.line_start, 1);
        assert_eq!(todo.line_end, 25);
        let props: Vec<_> = todo.props.iter().map(|p| (p.name.as_str(), p.prop_type.as_str(), p.required)).collect();
        assert_eq!(props, vec![("title", "string", false), ("limit", "number", true)]);
        let state: Vec<_> = todo.state.iter().map(|s| (s.name.as_str(), s.state_type.as_str())).collect();
        assert_eq!(state, vec![("todos", "array"), ("filter", "string")]);
        assert_eq!(todo.hooks, vec!["mounted"]);
        let events: Vec<_> = todo.events.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(events, vec!["ready", "select"]);
        assert_eq!(todo.children, vec!["TodoItem", "BaseButton"]);
        assert_eq!(todo.component_type, ComponentType::Functional);
    }

    #[test]
    fn test_script_setup_component() {
        let src = "<script setup lang=\"ts\">\nimport { ref, onMounted } from 'vue'\nconst props = defineProps<{ label: string; count?: number }>()\nconst open = ref(false)\nonMounted(() => {})\nconst emit = defineEmits(['toggle'])\nfunction flip() { emit('toggle') }\n</script>\n<template><button>{{ label }}</button></template>\n";
        let (components, _) = parse("src/components/toggle-button.vue", src);
        let toggle = &components[0];
        assert_eq!(toggle.name, "ToggleButton");
        assert_eq!(toggle.props.len(), 2);
        assert!(toggle.props[0].required);
        assert!(!toggle.props[1].required);
        assert_eq!(toggle.props[1].prop_type, "number");
        assert_eq!(toggle.state[0].name, "open");
        assert_eq!(toggle.state[0].state_type, "boolean");
        assert_eq!(toggle.hooks, vec!["onMounted"]);
        assert_eq!(toggle.events[0].name, "toggle");
        assert_eq!(toggle.dependencies, vec!["vue"]);
    }

    #[test]
    fn test_line_end_is_the_closing_tag_line() {
        let src = "<script>\nexport default { name: 'Tag' }\n</script>\n\n<template>\n  <span/>\n</template>\n\n<style>.a{}</style>\n";
        let (components, _) = parse("src/components/Tag.vue", src);
        assert_eq!(components[0].line_start, 1);
        assert_eq!(components[0].line_end, 7);

        let lines: Vec<_> = OPTIONS_SFC.lines().collect();
        let (components, _) = parse("src/components/TodoList.vue", OPTIONS_SFC);
        assert_eq!(lines[components[0].line_end - 1], "</script>");
    }

    #[test]
    fn test_first_end_tag_wins() {
        let src = "<template>\n  <div>\n    <template v-if=\"x\"><p/></template>\n  </div>\n</template>\n";
        let section = find_section(&src.lines().collect::<Vec<_>>(), "template").unwrap();
        assert_eq!(section.end, 2);
    }

    #[test]
    fn test_missing_sections() {
        let (components, diagnostics) = parse("src/components/Empty.vue", "<style>.a{}</style>\n");
        assert!(components.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }
}
