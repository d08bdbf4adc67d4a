//! TypeScript (React) emitter

use std::sync::Arc;

use heck::ToLowerCamelCase;
use serde_json::{json, Value};
use stackshift_parsers::{UIRNode, UirNodeType};

use crate::emitters::{function_data, root_component, state_data, style_rules, type_name, UirEmitter};
use crate::error::Result;
use crate::models::{CommentSyntax, ConvertedFile, EmitContext, FileType, TargetFramework};
use crate::renderer::{names, TemplateRenderer};
use crate::type_mapper::TypeMapper;

/// Prop data for the TypeScript-flavoured templates.
///
/// A prop with a default is never required. `marker` is the Angular field
/// suffix: `!` for required, `?` for optional without default.
pub(crate) fn props_data(node: &UIRNode, mapper: &TypeMapper) -> Vec<Value> {
    node.prop_specs()
        .iter()
        .map(|p| {
            let required = p.required && p.default.is_none();
            let marker = match (&p.default, required) {
                (Some(_), _) => "",
                (None, true) => "!",
                (None, false) => "?",
            };
            json!({
                "name": p.name,
                "type": mapper.map(&p.prop_type, p.default.as_ref()),
                "required": required,
                "hasDefault": p.default.is_some(),
                "default": mapper.literal(p.default.as_ref()),
                "marker": marker,
            })
        })
        .collect()
}

/// Emits React function components under `src/`
#[derive(Debug)]
pub struct TypeScriptEmitter {
    renderer: Arc<TemplateRenderer>,
    mapper: TypeMapper,
}

impl TypeScriptEmitter {
    pub fn new(renderer: Arc<TemplateRenderer>) -> Self {
        Self {
            renderer,
            mapper: TypeMapper::new(TargetFramework::TypeScript),
        }
    }

    fn component(&self, node: &UIRNode, ctx: &EmitContext) -> Result<ConvertedFile> {
        let name = type_name(node);
        let props = props_data(node, &self.mapper);
        let state = state_data(node, &self.mapper);
        let data = json!({
            "header": ctx.source_comment(CommentSyntax::Line, &node.metadata.source_file),
            "name": name,
            "hasProps": !props.is_empty(),
            "hasState": !state.is_empty(),
            "props": props,
            "state": state,
        });
        let content = self.renderer.render(names::TS_COMPONENT, &data)?;
        Ok(ConvertedFile::new(
            &node.metadata.source_file,
            format!("src/components/{}.tsx", name),
            content,
            FileType::Component,
            "typescript",
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

    fn stylesheet(&self, node: &UIRNode, ctx: &EmitContext) -> Result<ConvertedFile> {
        let data = json!({
            "header": ctx.source_comment(CommentSyntax::Block, &node.metadata.source_file),
            "rules": style_rules(node),
        });
        let content = self.renderer.render(names::TS_STYLE, &data)?;
        Ok(ConvertedFile::new(
            &node.metadata.source_file,
            format!("src/styles/{}.module.css", node.name),
            content,
            FileType::Style,
            "css",
        ))
    }
}

impl UirEmitter for TypeScriptEmitter {
    fn target(&self) -> TargetFramework {
        TargetFramework::TypeScript
    }

    fn emit(&self, node: &UIRNode, ctx: &EmitContext) -> Result<Option<ConvertedFile>> {
        match node.node_type {
            UirNodeType::Component => self.component(node, ctx).map(Some),
            UirNodeType::Function => self.function(node, ctx).map(Some),
            UirNodeType::Stylesheet => self.stylesheet(node, ctx).map(Some),
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
                self.renderer.render(names::TS_PACKAGE, &data)?,
                FileType::Config,
                "json",
            ),
            ConvertedFile::project(
                "tsconfig.json",
                self.renderer.render(names::TS_TSCONFIG, &data)?,
                FileType::Config,
                "json",
            ),
            ConvertedFile::project(
                "src/index.tsx",
                self.renderer.render(names::TS_INDEX, &data)?,
                FileType::Entry,
                "typescript",
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::test_support;
    use crate::models::TranspileOptions;

    fn emitter() -> TypeScriptEmitter {
        TypeScriptEmitter::new(Arc::new(TemplateRenderer::new().unwrap()))
    }

    #[test]
    fn test_props_and_state() {
        let ctx = EmitContext::new("react", TranspileOptions::default());
        let file = emitter().emit(&test_support::counter(), &ctx).unwrap().unwrap();
        assert_eq!(file.new_path, "src/components/Counter.tsx");
        assert!(file.content.contains("import React, { useState } from 'react';"));
        assert!(file.content.contains("interface CounterProps {"));
        assert!(file.content.contains("  label: string;"));
        assert!(file.content.contains("  step?: number;"));
        assert!(file
            .content
            .contains("const Counter: React.FC<CounterProps> = ({ label, step = 1 }) => {"));
        assert!(file.content.contains("const [count, setCount] = useState<number>(0);"));
        assert!(file.content.contains("<h1>Converted Component</h1>"));
        assert!(file.content.contains("export default Counter;"));
    }

    #[test]
    fn test_propless_component() {
        let ctx = EmitContext::new("react", TranspileOptions::default());
        let file = emitter().emit(&test_support::plain("App"), &ctx).unwrap().unwrap();
        assert!(file.content.contains("const App: React.FC = () => {"));
        assert!(file.content.contains("import React from 'react';"));
        assert!(!file.content.contains("interface AppProps"));
    }

    #[test]
    fn test_css_module() {
        let ctx = EmitContext::new("react", TranspileOptions::default());
        let file = emitter().emit(&test_support::stylesheet(), &ctx).unwrap().unwrap();
        assert_eq!(file.new_path, "src/styles/main.module.css");
        assert!(file.content.contains("/* Converted from src/main.css */"));
        assert!(file.content.contains(".hero-title {"));
        assert!(file.content.contains("  color: red;"));
    }

    #[test]
    fn test_function_without_source_comments() {
        let options = TranspileOptions {
            include_source_comments: false,
            ..TranspileOptions::default()
        };
        let ctx = EmitContext::new("react", options);
        let file = emitter().emit(&test_support::function(), &ctx).unwrap().unwrap();
        assert_eq!(file.new_path, "src/utils/formatPrice.ts");
        assert!(file.content.contains("export function formatPrice(amount: any, currency: any): any {"));
        assert!(!file.content.contains("Converted from"));
        assert!(!file.content.contains("toFixed"));
    }

    #[test]
    fn test_entry_renders_root_component() {
        let mut ctx = EmitContext::new("react", TranspileOptions::default());
        ctx.component_names = vec!["App".into()];
        let files = emitter().project_files(&ctx).unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.new_path.as_str()).collect();
        assert_eq!(paths, vec!["package.json", "tsconfig.json", "src/index.tsx"]);
        assert!(files[2].content.contains("import App from './components/App';"));
        assert!(files[2].content.contains("<App />"));
    }
}
