//! End-to-end tests for the transpiler

use std::sync::Arc;

use stackshift_detect::ProjectFile;
use stackshift_generation::{
    ConvertedFile, EmitContext, EmitterRegistry, FileType, GenerationError, Result, TargetFramework,
    TemplateRenderer, Transpiler, TranspileOptions, UirEmitter,
};
use stackshift_parsers::UIRNode;

fn options() -> TranspileOptions {
    TranspileOptions {
        readme_timestamp: false,
        ..TranspileOptions::default()
    }
}

#[test]
fn test_component_body_is_replaced_by_placeholder() {
    let files = vec![ProjectFile::new("App.jsx", "const App = () => { return <div>Hi</div>; }")];
    let result = Transpiler::new()
        .unwrap()
        .transpile_project(&files, "react", "typescript", &options());

    assert!(result.success);
    let app = result.file("src/components/App.tsx").expect("component file");
    assert_eq!(app.original_path, "App.jsx");
    assert_eq!(app.file_type, FileType::Component);
    assert!(app.content.contains("const App: React.FC = () => {"));
    assert!(app.content.contains("<h1>Converted Component</h1>"));
    assert!(!app.content.contains("<div>Hi</div>"));
}

#[test]
fn test_counter_becomes_stateful_widget() {
    let files = vec![ProjectFile::new(
        "Counter.jsx",
        "const Counter = () => { const [count, setCount] = useState(0); return <div>{count}</div>; }",
    )];
    let result = Transpiler::new()
        .unwrap()
        .transpile_project(&files, "react", "flutter", &options());

    let widget = result.file("lib/widgets/counter_widget.dart").expect("widget file");
    assert!(widget.content.contains("class Counter extends StatefulWidget"));
    assert!(widget.content.contains("int count = 0;"));
    assert!(result.file("pubspec.yaml").is_some());
    assert!(result.file("lib/main.dart").is_some());
    assert!(result.file("README.md").is_some());
}

#[test]
fn test_assets_only_project_yields_scaffolding() {
    let files = vec![
        ProjectFile::binary("assets/logo.png", 2048),
        ProjectFile::new("README.md", "# Shop\n"),
    ];
    let result = Transpiler::new()
        .unwrap()
        .transpile_project(&files, "react", "typescript", &options());

    assert!(result.success);
    assert!(result.files.iter().all(|f| f.original_path.is_empty()));
    let paths: Vec<_> = result.files.iter().map(|f| f.new_path.as_str()).collect();
    assert_eq!(paths, vec!["package.json", "tsconfig.json", "src/index.tsx", "README.md"]);
    assert_eq!(result.warnings.len(), 2);
}

#[test]
fn test_every_target_emits_functions_and_components() {
    let files = vec![
        ProjectFile::new("src/components/Card.jsx", "export const Card = ({ title = 'Hi' }) => { return <section>{title}</section>; }"),
        ProjectFile::new("src/utils/price.js", "export function formatPrice(amount) {\n  return amount.toFixed(2);\n}\n"),
    ];
    let transpiler = Transpiler::new().unwrap();
    let expected = [
        ("flutter", "lib/widgets/card_widget.dart", "lib/utils/format_price.dart"),
        (
            "android",
            "app/src/main/java/com/example/app/ui/components/Card.kt",
            "app/src/main/java/com/example/app/utils/FormatPrice.kt",
        ),
        ("ts", "src/components/Card.tsx", "src/utils/formatPrice.ts"),
        ("vue", "src/components/Card.vue", "src/utils/formatPrice.ts"),
        ("angular", "src/app/components/card/card.component.ts", "src/app/utils/format-price.ts"),
    ];
    for (target, component, function) in expected {
        let result = transpiler.transpile_project(&files, "react", target, &options());
        assert!(result.errors.is_empty(), "{}: {:?}", target, result.errors);
        assert_eq!(result.file(component).map(|f| f.file_type), Some(FileType::Component), "{}", target);
        assert_eq!(result.file(function).map(|f| f.file_type), Some(FileType::Function), "{}", target);
    }
}

#[test]
fn test_line_counts_match_content() {
    let files = vec![ProjectFile::new("src/App.jsx", "const App = () => <div/>;")];
    let result = Transpiler::new()
        .unwrap()
        .transpile_project(&files, "react", "kotlin", &options());
    for file in &result.files {
        assert_eq!(file.line_count, file.content.lines().count(), "{}", file.new_path);
    }
}

/// Fails on nodes named `Broken`, delegates everything else
struct FlakyEmitter {
    inner: Arc<dyn UirEmitter>,
}

impl UirEmitter for FlakyEmitter {
    fn target(&self) -> TargetFramework {
        TargetFramework::TypeScript
    }

    fn emit(&self, node: &UIRNode, ctx: &EmitContext) -> Result<Option<ConvertedFile>> {
        if node.name == "Broken" {
            return Err(GenerationError::EmissionFailed {
                node: node.name.clone(),
                message: "refused".into(),
            });
        }
        self.inner.emit(node, ctx)
    }

    fn project_files(&self, ctx: &EmitContext) -> Result<Vec<ConvertedFile>> {
        self.inner.project_files(ctx)
    }
}

#[test]
fn test_emission_errors_do_not_stop_siblings() {
    let renderer = Arc::new(TemplateRenderer::new().unwrap());
    let mut registry = EmitterRegistry::with_renderer(renderer.clone());
    let inner = registry.get(TargetFramework::TypeScript).unwrap();
    registry.register(Arc::new(FlakyEmitter { inner }));
    let transpiler = Transpiler::with_registry(registry, renderer);

    let files = vec![
        ProjectFile::new("src/Broken.jsx", "const Broken = () => <div/>;"),
        ProjectFile::new("src/Fine.jsx", "const Fine = () => <div/>;"),
    ];
    let result = transpiler.transpile_project(&files, "react", "typescript", &options());

    assert!(result.success);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].node, "Broken");
    assert_eq!(result.errors[0].file, "src/Broken.jsx");
    assert!(result.file("src/components/Fine.tsx").is_some());
    assert!(result.file("src/components/Broken.tsx").is_none());
}
