//! Vue 3 single-file component emitter

use std::sync::Arc;

use heck::ToLowerCamelCase;
use serde_json::json;
use stackshift_parsers::{UIRNode, UirNodeType};

use crate::emitters::typescript::props_data;
use crate::emitters::{function_data, root_component, state_data, type_name, UirEmitter};
use crate::error::Result;
use crate::models::{CommentSyntax, ConvertedFile, EmitContext, FileType, TargetFramework};
use crate::renderer::{names, TemplateRenderer};
use crate::type_mapper::TypeMapper;

/// Emits `<script setup>` components under `src/`. Stylesheets are not emitted.
#[derive(Debug)]
pub struct VueEmitter {
    renderer: Arc<TemplateRenderer>,
    mapper: TypeMapper,
}

impl VueEmitter {
    pub fn new(renderer: Arc<TemplateRenderer>) -> Self {
        Self {
            renderer,
            mapper: TypeMapper::new(TargetFramework::Vue),
        }
    }

    fn component(&self, node: &UIRNode, ctx: &EmitContext) -> Result<ConvertedFile> {
        let name = type_name(node);
        let props = props_data(node, &self.mapper);
        let state = state_data(node, &self.mapper);
        let has_defaults = node.prop_specs().iter().any(|p| p.default.is_some());
        let data = json!({
            "header": ctx.source_comment(CommentSyntax::Html, &node.metadata.source_file),
            "name": name,
            "hasProps": !props.is_empty(),
            "hasDefaults": has_defaults,
            "hasState": !state.is_empty(),
            "props": props,
            "state": state,
        });
        let content = self.renderer.render(names::VUE_COMPONENT, &data)?;
        Ok(ConvertedFile::new(
            &node.metadata.source_file,
            format!("src/components/{}.vue", name),
            content,
            FileType::Component,
            "vue",
        ))
    }

    fn function(&self, node: &UIRNode, ctx: &EmitContext) -> Result<ConvertedFile> {
        let data = function_data(node, ctx, CommentSyntax::Line);
        let content = self.renderer.render(names::TS_FUNCTION, &data)?;
        Ok(ConvertedFile::new(
            &node.metadata.source_file,
            format!("src/utils/{}.ts", node.name.to_lower_camel_case()),
            content,
            FileType::Function,
            "typescript",
        ))
    }
}

impl UirEmitter for VueEmitter {
    fn target(&self) -> TargetFramework {
        TargetFramework::Vue
    }

    fn emit(&self, node: &UIRNode, ctx: &EmitContext) -> Result<Option<ConvertedFile>> {
        match node.node_type {
            UirNodeType::Component => self.component(node, ctx).map(Some),
            UirNodeType::Function => self.function(node, ctx).map(Some),
            _ => Ok(None),
        }
    }

    fn project_files(&self, ctx: &EmitContext) -> Result<Vec<ConvertedFile>> {
        let data = json!({
            "projectName": ctx.options.project_name,
            "root": root_component(ctx),
        });
        Ok(vec![
            ConvertedFile::project(
                "package.json",
                self.renderer.render(names::VUE_PACKAGE, &data)?,
                FileType::Config,
                "json",
            ),
            ConvertedFile::project(
                "src/main.ts",
                self.renderer.render(names::VUE_MAIN, &data)?,
                FileType::Entry,
                "typescript",
            ),
            ConvertedFile::project(
                "src/App.vue",
                self.renderer.render(names::VUE_APP, &data)?,
                FileType::Entry,
                "vue",
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::test_support;
    use crate::models::TranspileOptions;

    fn emitter() -> VueEmitter {
        VueEmitter::new(Arc::new(TemplateRenderer::new().unwrap()))
    }

    #[test]
    fn test_single_file_component() {
        let ctx = EmitContext::new("react", TranspileOptions::default());
        let file = emitter().emit(&test_support::counter(), &ctx).unwrap().unwrap();
        assert_eq!(file.new_path, "src/components/Counter.vue");
        assert!(file.content.contains("<!-- Converted from src/Counter.jsx -->"));
        assert!(file.content.contains("defineOptions({ name: 'Counter' });"));
        assert!(file.content.contains("withDefaults(defineProps<{"));
        assert!(file.content.contains("  step: 1,"));
        assert!(file.content.contains("const count = ref<number>(0);"));
        assert!(file.content.contains("<h1>Converted Component</h1>"));
    }

    #[test]
    fn test_stylesheet_is_not_emitted() {
        let ctx = EmitContext::new("react", TranspileOptions::default());
        assert!(emitter().emit(&test_support::stylesheet(), &ctx).unwrap().is_none());
    }

    #[test]
    fn test_app_shell_without_components() {
        let ctx = EmitContext::new("react", TranspileOptions::default());
        let files = emitter().project_files(&ctx).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files[2].content.contains("<h1>converted_app</h1>"));
    }
}
