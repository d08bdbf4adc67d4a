//! Kotlin (Jetpack Compose) emitter

use std::sync::Arc;

use heck::ToUpperCamelCase;
use serde_json::json;
use stackshift_parsers::{UIRNode, UirNodeType};

use crate::emitters::{function_data, state_data, style_rules, type_name, UirEmitter};
use crate::error::Result;
use crate::models::{CommentSyntax, ConvertedFile, EmitContext, FileType, TargetFramework};
use crate::renderer::{names, TemplateRenderer};
use crate::type_mapper::TypeMapper;

/// Emits composables under `app/src/main/java/<package>/`
#[derive(Debug)]
pub struct KotlinEmitter {
    renderer: Arc<TemplateRenderer>,
    mapper: TypeMapper,
}

impl KotlinEmitter {
    pub fn new(renderer: Arc<TemplateRenderer>) -> Self {
        Self {
            renderer,
            mapper: TypeMapper::new(TargetFramework::Kotlin),
        }
    }

    fn source_root(ctx: &EmitContext) -> String {
        format!("app/src/main/java/{}", ctx.package_path())
    }

    fn component(&self, node: &UIRNode, ctx: &EmitContext) -> Result<ConvertedFile> {
        let name = type_name(node);
        let props: Vec<_> = node
            .prop_specs()
            .iter()
            .map(|p| {
                let mapped = self.mapper.map(&p.prop_type, p.default.as_ref());
                let decl = match (&p.default, p.required) {
                    (Some(default), _) => {
                        format!("{}: {} = {}", p.name, mapped, self.mapper.literal(Some(default)))
                    }
                    (None, true) => format!("{}: {}", p.name, mapped),
                    (None, false) => format!("{}: {} = null", p.name, self.mapper.nullable(&mapped)),
                };
                json!({ "name": p.name, "decl": decl })
            })
            .collect();
        let state = state_data(node, &self.mapper);

        let data = json!({
            "header": ctx.source_comment(CommentSyntax::Line, &node.metadata.source_file),
            "name": name,
            "packageId": ctx.options.package_id,
            "hasState": !state.is_empty(),
            "props": props,
            "state": state,
        });
        let content = self.renderer.render(names::KOTLIN_COMPONENT, &data)?;
        Ok(ConvertedFile::new(
            &node.metadata.source_file,
            format!("{}/ui/components/{}.kt", Self::source_root(ctx), name),
            content,
            FileType::Component,
            "kotlin",
        ))
    }

    fn function(&self, node: &UIRNode, ctx: &EmitContext) -> Result<ConvertedFile> {
        let data = function_data(node, ctx, CommentSyntax::Line);
        let content = self.renderer.render(names::KOTLIN_FUNCTION, &data)?;
        Ok(ConvertedFile::new(
            &node.metadata.source_file,
            format!(
                "{}/utils/{}.kt",
                Self::source_root(ctx),
                node.name.to_upper_camel_case()
            ),
            content,
            FileType::Function,
            "kotlin",
        ))
    }

    fn stylesheet(&self, node: &UIRNode, ctx: &EmitContext) -> Result<ConvertedFile> {
        let data = json!({
            "header": ctx.source_comment(CommentSyntax::Line, &node.metadata.source_file),
            "name": node.name,
            "packageId": ctx.options.package_id,
            "rules": style_rules(node),
        });
        let content = self.renderer.render(names::KOTLIN_STYLE, &data)?;
        Ok(ConvertedFile::new(
            &node.metadata.source_file,
            format!(
                "{}/ui/theme/{}Styles.kt",
                Self::source_root(ctx),
                node.name.to_upper_camel_case()
            ),
            content,
            FileType::Style,
            "kotlin",
        ))
    }
}

impl UirEmitter for KotlinEmitter {
    fn target(&self) -> TargetFramework {
        TargetFramework::Kotlin
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
            "packageId": ctx.options.package_id,
        });
        Ok(vec![
            ConvertedFile::project(
                "build.gradle.kts",
                self.renderer.render(names::KOTLIN_GRADLE, &data)?,
                FileType::Config,
                "kotlin",
            ),
            ConvertedFile::project(
                format!("{}/MainActivity.kt", Self::source_root(ctx)),
                self.renderer.render(names::KOTLIN_MAIN_ACTIVITY, &data)?,
                FileType::Entry,
                "kotlin",
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::test_support;
    use crate::models::TranspileOptions;

    fn emitter() -> KotlinEmitter {
        KotlinEmitter::new(Arc::new(TemplateRenderer::new().unwrap()))
    }

    #[test]
    fn test_composable() {
        let ctx = EmitContext::new("react", TranspileOptions::default());
        let file = emitter().emit(&test_support::counter(), &ctx).unwrap().unwrap();
        assert_eq!(
            file.new_path,
            "app/src/main/java/com/example/app/ui/components/Counter.kt"
        );
        assert!(file.content.contains("package com.example.app.ui.components"));
        assert!(file.content.contains("fun Counter(label: String, step: Int = 1) {"));
        assert!(file.content.contains("var count by remember { mutableStateOf<Int>(0) }"));
        assert!(file.content.contains("Text(text = \"Counter\")"));
    }

    #[test]
    fn test_custom_package_moves_files() {
        let options = TranspileOptions {
            package_id: "org.shop.mobile".into(),
            ..TranspileOptions::default()
        };
        let ctx = EmitContext::new("react", options);
        let emitter = emitter();
        let func = emitter.emit(&test_support::function(), &ctx).unwrap().unwrap();
        assert_eq!(func.new_path, "app/src/main/java/org/shop/mobile/utils/FormatPrice.kt");
        assert!(func.content.contains("fun formatPrice(amount: Any?, currency: Any?): Any? {"));

        let style = emitter.emit(&test_support::stylesheet(), &ctx).unwrap().unwrap();
        assert_eq!(style.new_path, "app/src/main/java/org/shop/mobile/ui/theme/MainStyles.kt");

        let project = emitter.project_files(&ctx).unwrap();
        assert_eq!(project[1].new_path, "app/src/main/java/org/shop/mobile/MainActivity.kt");
        assert!(project[0].content.contains("applicationId = \"org.shop.mobile\""));
    }

    #[test]
    fn test_stateless_composable_skips_state_imports() {
        let ctx = EmitContext::new("react", TranspileOptions::default());
        let file = emitter().emit(&test_support::plain("Footer"), &ctx).unwrap().unwrap();
        assert!(file.content.contains("fun Footer() {"));
        assert!(!file.content.contains("mutableStateOf"));
    }
}
