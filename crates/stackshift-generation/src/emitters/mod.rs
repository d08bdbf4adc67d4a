//! Target-specific emitters
//!
//! Each target implements [`UirEmitter`]. The [`EmitterRegistry`] maps a
//! [`TargetFramework`] to its emitter; a target with no emitter produces
//! nothing.

pub mod angular;
pub mod flutter;
pub mod kotlin;
pub mod typescript;
pub mod vue;

pub use angular::AngularEmitter;
pub use flutter::FlutterEmitter;
pub use kotlin::KotlinEmitter;
pub use typescript::TypeScriptEmitter;
pub use vue::VueEmitter;

use std::collections::HashMap;
use std::sync::Arc;

use heck::ToUpperCamelCase;
use serde_json::{json, Value};
use stackshift_parsers::uir::KEY_BODY;
use stackshift_parsers::{StateSpec, UIRNode, UirNodeType};

use crate::error::Result;
use crate::models::{CommentSyntax, ConvertedFile, EmitContext, TargetFramework};
use crate::renderer::TemplateRenderer;
use crate::type_mapper::TypeMapper;

/// Turns UIR nodes into files for one target framework
pub trait UirEmitter: Send + Sync {
    /// Framework this emitter writes
    fn target(&self) -> TargetFramework;

    /// Emit one node.
    ///
    /// `Ok(None)` means the node has no file of its own on this target
    /// (imports, exports and bare elements are folded into their component).
    fn emit(&self, node: &UIRNode, ctx: &EmitContext) -> Result<Option<ConvertedFile>>;

    /// Project-level files: manifest, entry point and friends
    fn project_files(&self, ctx: &EmitContext) -> Result<Vec<ConvertedFile>>;
}

/// Registry of emitters keyed by target
#[derive(Clone, Default)]
pub struct EmitterRegistry {
    emitters: HashMap<TargetFramework, Arc<dyn UirEmitter>>,
}

impl EmitterRegistry {
    /// Registry with no emitters
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with the built-in emitter for every target
    pub fn new() -> Result<Self> {
        let renderer = Arc::new(TemplateRenderer::new()?);
        Ok(Self::with_renderer(renderer))
    }

    pub fn with_renderer(renderer: Arc<TemplateRenderer>) -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(FlutterEmitter::new(renderer.clone())));
        registry.register(Arc::new(KotlinEmitter::new(renderer.clone())));
        registry.register(Arc::new(TypeScriptEmitter::new(renderer.clone())));
        registry.register(Arc::new(VueEmitter::new(renderer.clone())));
        registry.register(Arc::new(AngularEmitter::new(renderer)));
        registry
    }

    /// Register an emitter, replacing any previous one for its target
    pub fn register(&mut self, emitter: Arc<dyn UirEmitter>) {
        self.emitters.insert(emitter.target(), emitter);
    }

    pub fn get(&self, target: TargetFramework) -> Option<Arc<dyn UirEmitter>> {
        self.emitters.get(&target).cloned()
    }

    /// Registered targets, sorted
    pub fn targets(&self) -> Vec<TargetFramework> {
        let mut targets: Vec<_> = self.emitters.keys().copied().collect();
        targets.sort();
        targets
    }
}

impl std::fmt::Debug for EmitterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmitterRegistry")
            .field("targets", &self.targets())
            .finish()
    }
}

/// Component name as a type name
pub(crate) fn type_name(node: &UIRNode) -> String {
    node.name.to_upper_camel_case()
}

/// Setter for a piece of state, `setX` when the source did not name one
pub(crate) fn setter_name(state: &StateSpec) -> String {
    state
        .setter
        .clone()
        .unwrap_or_else(|| format!("set{}", state.name.to_upper_camel_case()))
}

/// Component the entry point renders: `App` when present, else the first one
pub(crate) fn root_component(ctx: &EmitContext) -> Option<String> {
    ctx.component_names
        .iter()
        .find(|n| n.as_str() == "App")
        .or_else(|| ctx.component_names.first())
        .map(|n| n.to_upper_camel_case())
}

/// Original function body, one entry per line, when source comments are on
pub(crate) fn source_lines(node: &UIRNode, ctx: &EmitContext) -> Vec<String> {
    if !ctx.options.include_source_comments {
        return Vec::new();
    }
    node.prop_str(KEY_BODY)
        .map(|body| body.lines().map(|l| l.trim_end().to_string()).collect())
        .unwrap_or_default()
}

/// Template data shared by every function template
pub(crate) fn function_data(node: &UIRNode, ctx: &EmitContext, syntax: CommentSyntax) -> Value {
    json!({
        "header": ctx.source_comment(syntax, &node.metadata.source_file),
        "name": node.name,
        "params": node.params(),
        "isAsync": node.prop_bool("async"),
        "sourceLines": source_lines(node, ctx),
        "packageId": ctx.options.package_id,
    })
}

/// Template data for the rules of a stylesheet node
pub(crate) fn style_rules(node: &UIRNode) -> Vec<Value> {
    node.children
        .iter()
        .filter(|c| c.node_type == UirNodeType::StyleRule && !c.name.is_empty())
        .map(|rule| {
            let declarations = rule
                .props
                .get("declarations")
                .cloned()
                .unwrap_or_else(|| json!({}));
            let summary = declarations
                .as_object()
                .map(|map| {
                    map.iter()
                        .map(|(k, v)| format!("{}: {}", k, v.as_str().unwrap_or_default()))
                        .collect::<Vec<_>>()
                        .join("; ")
                })
                .unwrap_or_default();
            json!({
                "className": rule.name,
                "declarations": declarations,
                "summary": summary,
            })
        })
        .collect()
}

/// Name, type and initial value of each state entry, shaped for a target
pub(crate) fn state_data(node: &UIRNode, mapper: &TypeMapper) -> Vec<Value> {
    node.state_specs()
        .iter()
        .map(|s| {
            let ty = mapper.map(&s.state_type, s.initial.as_ref());
            let ty = if s.initial.is_some() { ty } else { mapper.nullable(&ty) };
            json!({
                "name": s.name,
                "setter": setter_name(s),
                "type": ty,
                "initial": mapper.literal(s.initial.as_ref()),
            })
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_every_target() {
        let registry = EmitterRegistry::new().unwrap();
        assert_eq!(registry.targets(), TargetFramework::ALL.to_vec());
        for target in TargetFramework::ALL {
            assert_eq!(registry.get(target).map(|e| e.target()), Some(target));
        }
        assert!(EmitterRegistry::empty().get(TargetFramework::Vue).is_none());
    }

    #[test]
    fn test_style_rule_summary() {
        let rules = style_rules(&test_support::stylesheet());
        assert_eq!(rules[0]["summary"], "color: red; margin: 0");
    }

    #[test]
    fn test_root_component_prefers_app() {
        let mut ctx = EmitContext::default();
        assert_eq!(root_component(&ctx), None);
        ctx.component_names = vec!["Header".into(), "App".into()];
        assert_eq!(root_component(&ctx).as_deref(), Some("App"));
        ctx.component_names = vec!["Header".into()];
        assert_eq!(root_component(&ctx).as_deref(), Some("Header"));
    }

    #[test]
    fn test_setter_defaults() {
        let spec = StateSpec {
            name: "open".into(),
            setter: None,
            state_type: "boolean".into(),
            initial: None,
        };
        assert_eq!(setter_name(&spec), "setOpen");
    }
}
