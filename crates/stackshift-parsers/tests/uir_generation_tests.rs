//! End-to-end tests for tree-sitter parsing and UIR generation

use stackshift_parsers::{AstParser, NodeType, ParserError, UIRNode, UirGenerator, UirNodeType};

fn uir(path: &str, code: &str) -> Vec<UIRNode> {
    let tree = AstParser::new().parse_file(path, code).expect("supported file");
    UirGenerator::new().generate_uir(&tree, "react").value
}

#[test]
fn test_scenario_component_keeps_identity_and_markup() {
    let nodes = uir("App.jsx", "const App = () => { return <div>Hi</div>; }");
    assert_eq!(nodes.len(), 1);
    let app = &nodes[0];
    assert_eq!(app.node_type, UirNodeType::Component);
    assert_eq!(app.name, "App");
    assert_eq!(app.metadata.source_file, "App.jsx");
    assert_eq!(app.metadata.line_start, 1);
    assert_eq!(app.root_element().map(|e| e.name.as_str()), Some("div"));
}

#[test]
fn test_typescript_grammar_for_ts_files() {
    let code = "export function total(items: number[]): number {\n  return items.reduce((a, b) => a + b, 0);\n}\n";
    let nodes = uir("src/utils/total.ts", code);
    let total = nodes
        .iter()
        .find(|n| n.node_type == UirNodeType::Function)
        .expect("function node");
    assert_eq!(total.name, "total");
    assert_eq!(total.params(), vec!["items".to_string()]);
}

#[test]
fn test_tsx_component_with_typed_props() {
    let code = r#"
interface ButtonProps {
  label: string;
  disabled?: boolean;
}

export const Button = ({ label, disabled = false }: ButtonProps) => {
  const [pressed, setPressed] = useState(false);
  return <button disabled={disabled}>{label}</button>;
};
"#;
    let nodes = uir("src/components/Button.tsx", code);
    let button = nodes.iter().find(|n| n.is_component()).expect("component");
    let props = button.prop_specs();
    assert_eq!(props.len(), 2);
    assert_eq!(props[0].prop_type, "string");
    assert_eq!(props[1].prop_type, "boolean");
    assert_eq!(button.state_specs()[0].state_type, "boolean");
    assert!(button.prop_bool("exported"));
}

#[test]
fn test_unsupported_extension_is_an_error() {
    let err = AstParser::new().parse_file("README.md", "# hi").unwrap_err();
    assert!(matches!(err, ParserError::UnsupportedLanguage { .. }));
}

#[test]
fn test_broken_file_does_not_stop_the_batch() {
    let parser = AstParser::new();
    let generator = UirGenerator::new();
    let inputs = [
        ("bad.js", ")))}}}((("),
        ("Good.jsx", "export default function Good() { return <p>ok</p>; }"),
    ];

    let mut components = Vec::new();
    let mut diagnostics = Vec::new();
    for (path, code) in inputs {
        let tree = parser.parse_file(path, code).expect("supported");
        let result = generator.generate_uir(&tree, "react");
        components.extend(result.value.into_iter().filter(|n| n.is_component()));
        diagnostics.extend(result.diagnostics);
    }

    assert_eq!(components.len(), 1);
    assert_eq!(components[0].name, "Good");
    assert!(diagnostics.iter().any(|d| d.file == "bad.js"));
}

#[test]
fn test_css_goes_through_regex_path() {
    let tree = AstParser::new()
        .parse_file("src/App.css", "@media (max-width: 600px) { .app { padding: 0 } }\na:hover { color: red }\n")
        .unwrap();
    assert_eq!(tree.root.node_type, NodeType::Stylesheet);
    let nodes = UirGenerator::new().generate_uir(&tree, "react").value;
    let rules: Vec<_> = nodes[0].children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(rules, vec!["app"]);
}

#[test]
fn test_generation_is_deterministic() {
    let code = "import React from 'react';\nexport const Card = ({ title = 'x' }) => <article><h3>{title}</h3></article>;\n";
    let first = serde_json::to_string(&uir("Card.jsx", code)).unwrap();
    let second = serde_json::to_string(&uir("Card.jsx", code)).unwrap();
    assert_eq!(first, second);
}
