//! Flutter (Dart) emitter

use std::sync::Arc;

use heck::ToSnakeCase;
use serde_json::json;
use stackshift_parsers::{UIRNode, UirNodeType};

use crate::emitters::{function_data, state_data, style_rules, type_name, UirEmitter};
use crate::error::Result;
use crate::models::{CommentSyntax, ConvertedFile, EmitContext, FileType, TargetFramework};
use crate::renderer::{names, TemplateRenderer};
use crate::type_mapper::TypeMapper;

/// Emits widgets under `lib/`
#[derive(Debug)]
pub struct FlutterEmitter {
    renderer: Arc<TemplateRenderer>,
    mapper: TypeMapper,
}

impl FlutterEmitter {
    pub fn new(renderer: Arc<TemplateRenderer>) -> Self {
        Self {
            renderer,
            mapper: TypeMapper::new(TargetFramework::Flutter),
        }
    }

    fn component(&self, node: &UIRNode, ctx: &EmitContext) -> Result<ConvertedFile> {
        let name = type_name(node);
        let props: Vec<_> = node
            .prop_specs()
            .iter()
            .map(|p| {
                let mapped = self.mapper.map(&p.prop_type, p.default.as_ref());
                let (ty, decl) = match (&p.default, p.required) {
                    (Some(default), _) => (
                        mapped,
                        format!("this.{} = {}", p.name, self.mapper.literal(Some(default))),
                    ),
                    (None, true) => (mapped, format!("required this.{}", p.name)),
                    (None, false) => (self.mapper.nullable(&mapped), format!("this.{}", p.name)),
                };
                json!({ "name": p.name, "type": ty, "decl": decl })
            })
            .collect();
        let state = state_data(node, &self.mapper);

        let data = json!({
            "header": ctx.source_comment(CommentSyntax::Line, &node.metadata.source_file),
            "name": name,
            "hasState": !state.is_empty(),
            "props": props,
            "state": state,
        });
        let content = self.renderer.render(names::FLUTTER_COMPONENT, &data)?;
        Ok(ConvertedFile::new(
            &node.metadata.source_file,
            format!("lib/widgets/{}_widget.dart", name.to_snake_case()),
            content,
            FileType::Component,
            "dart",
        ))
    }

    fn function(&self, node: &UIRNode, ctx: &EmitContext) -> Result<ConvertedFile> {
        let data = function_data(node, ctx, CommentSyntax::Line);
        let content = self.renderer.render(names::FLUTTER_FUNCTION, &data)?;
        Ok(ConvertedFile::new(
            &node.metadata.source_file,
            format!("lib/utils/{}.dart", node.name.to_snake_case()),
            content,
            FileType::Function,
            "dart",
        ))
    }

    fn stylesheet(&self, node: &UIRNode, ctx: &EmitContext) -> Result<ConvertedFile> {
        let data = json!({
            "header": ctx.source_comment(CommentSyntax::Line, &node.metadata.source_file),
            "name": node.name,
            "rules": style_rules(node),
        });
        let content = self.renderer.render(names::FLUTTER_STYLE, &data)?;
        Ok(ConvertedFile::new(
            &node.metadata.source_file,
            format!("lib/styles/{}_styles.dart", node.name.to_snake_case()),
            content,
            FileType::Style,
            "dart",
        ))
    }
}

impl UirEmitter for FlutterEmitter {
    fn target(&self) -> TargetFramework {
        TargetFramework::Flutter
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
            "fromFramework": ctx.from_framework,
        });
        Ok(vec![
            ConvertedFile::project(
                "pubspec.yaml",
                self.renderer.render(names::FLUTTER_PUBSPEC, &data)?,
                FileType::Config,
                "yaml",
            ),
            ConvertedFile::project(
                "lib/main.dart",
                self.renderer.render(names::FLUTTER_MAIN, &data)?,
                FileType::Entry,
                "dart",
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::test_support;
    use crate::models::TranspileOptions;

    fn emitter() -> FlutterEmitter {
        FlutterEmitter::new(Arc::new(TemplateRenderer::new().unwrap()))
    }

    #[test]
    fn test_stateful_widget() {
        let ctx = EmitContext::new("react", TranspileOptions::default());
        let file = emitter().emit(&test_support::counter(), &ctx).unwrap().unwrap();
        assert_eq!(file.new_path, "lib/widgets/counter_widget.dart");
        assert_eq!(file.file_type, FileType::Component);
        assert!(file.content.contains("// Converted from src/Counter.jsx"));
        assert!(file.content.contains("class Counter extends StatefulWidget {"));
        assert!(file.content.contains("  final String label;"));
        assert!(file.content.contains("required this.label"));
        assert!(file.content.contains("this.step = 1"));
        assert!(file.content.contains("  int count = 0;"));
        assert!(file.content.contains("return const Text('Counter');"));
    }

    #[test]
    fn test_stateless_widget() {
        let ctx = EmitContext::new("react", TranspileOptions::default());
        let file = emitter().emit(&test_support::plain("Header"), &ctx).unwrap().unwrap();
        assert_eq!(file.new_path, "lib/widgets/header_widget.dart");
        assert!(file.content.contains("class Header extends StatelessWidget {"));
        assert!(!file.content.contains("StatefulWidget"));
    }

    #[test]
    fn test_function_and_style_paths() {
        let ctx = EmitContext::new("react", TranspileOptions::default());
        let emitter = emitter();
        let func = emitter.emit(&test_support::function(), &ctx).unwrap().unwrap();
        assert_eq!(func.new_path, "lib/utils/format_price.dart");
        assert!(func.content.contains("dynamic formatPrice(dynamic amount, dynamic currency) {"));
        assert!(func.content.contains("//   return amount.toFixed(2);"));

        let style = emitter.emit(&test_support::stylesheet(), &ctx).unwrap().unwrap();
        assert_eq!(style.new_path, "lib/styles/main_styles.dart");
        assert!(style.content.contains("class MainStyles {"));
        assert!(style.content.contains("static const TextStyle heroTitle = TextStyle();"));
    }

    #[test]
    fn test_project_files() {
        let ctx = EmitContext::new("react", TranspileOptions::default());
        let files = emitter().project_files(&ctx).unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.new_path.as_str()).collect();
        assert_eq!(paths, vec!["pubspec.yaml", "lib/main.dart"]);
        assert!(files[0].content.contains("name: converted_app"));
        assert!(files[1].content.contains("runApp(const ConvertedApp());"));
    }
}
