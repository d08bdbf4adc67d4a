//! Angular standalone component emitter

use std::sync::Arc;

use heck::{ToKebabCase, ToUpperCamelCase};
use serde_json::json;
use stackshift_parsers::{UIRNode, UirNodeType};

use crate::emitters::typescript::props_data;
use crate::emitters::{function_data, root_component, state_data, type_name, UirEmitter};
use crate::error::Result;
use crate::models::{CommentSyntax, ConvertedFile, EmitContext, FileType, TargetFramework};
use crate::renderer::{names, TemplateRenderer};
use crate::type_mapper::TypeMapper;

/// `HeroDetailComponent` and `HeroDetail` both give `HeroDetail`
fn base_name(name: &str) -> String {
    let pascal = name.to_upper_camel_case();
    match pascal.strip_suffix("Component") {
        Some(base) if !base.is_empty() => base.to_string(),
        _ => pascal,
    }
}

/// Emits components under `src/app/`. Stylesheets are not emitted.
#[derive(Debug)]
pub struct AngularEmitter {
    renderer: Arc<TemplateRenderer>,
    mapper: TypeMapper,
}

impl AngularEmitter {
    pub fn new(renderer: Arc<TemplateRenderer>) -> Self {
        Self {
            renderer,
            mapper: TypeMapper::new(TargetFramework::Angular),
        }
    }

    fn component(&self, node: &UIRNode, ctx: &EmitContext) -> Result<ConvertedFile> {
        let base = base_name(&type_name(node));
        let file = base.to_kebab_case();
        let props = props_data(node, &self.mapper);
        let data = json!({
            "header": ctx.source_comment(CommentSyntax::Line, &node.metadata.source_file),
            "className": format!("{}Component", base),
            "selector": format!("app-{}", file),
            "hasProps": !props.is_empty(),
            "props": props,
            "state": state_data(node, &self.mapper),
        });
        let content = self.renderer.render(names::ANGULAR_COMPONENT, &data)?;
        Ok(ConvertedFile::new(
            &node.metadata.source_file,
            format!("src/app/components/{0}/{0}.component.ts", file),
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
            format!("src/app/utils/{}.ts", node.name.to_kebab_case()),
            content,
            FileType::Function,
            "typescript",
        ))
    }
}

impl UirEmitter for AngularEmitter {
    fn target(&self) -> TargetFramework {
        TargetFramework::Angular
    }

    fn emit(&self, node: &UIRNode, ctx: &EmitContext) -> Result<Option<ConvertedFile>> {
        match node.node_type {
            UirNodeType::Component => self.component(node, ctx).map(Some),
            UirNodeType::Function => self.function(node, ctx).map(Some),
            _ => Ok(None),
        }
    }

    fn project_files(&self, ctx: &EmitContext) -> Result<Vec<ConvertedFile>> {
        let root = root_component(ctx).map(|name| {
            let base = base_name(&name);
            json!({
                "className": format!("{}Component", base),
                "file": base.to_kebab_case(),
            })
        });
        let data = json!({
            "projectName": ctx.options.project_name,
            "root": root,
        });
        Ok(vec![
            ConvertedFile::project(
                "package.json",
                self.renderer.render(names::ANGULAR_PACKAGE, &data)?,
                FileType::Config,
                "json",
            ),
            ConvertedFile::project(
                "src/main.ts",
                self.renderer.render(names::ANGULAR_MAIN, &data)?,
                FileType::Entry,
                "typescript",
            ),
        ])
    }
}
