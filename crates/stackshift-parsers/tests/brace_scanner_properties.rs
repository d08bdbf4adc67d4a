//! Property-based tests for the brace-balance scanner

use proptest::prelude::*;
use stackshift_parsers::BraceScanner;

fn statement_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,6} = [a-z0-9]{1,6};".prop_map(|s| format!("  {}", s))
}

/// A function body of plain statements and nested `if` blocks
fn body_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            statement_strategy().prop_map(|s| vec![s]),
            prop::collection::vec(statement_strategy(), 0..3).prop_map(|inner| {
                let mut block = vec!["  if (x) {".to_string()];
                block.extend(inner.into_iter().map(|s| format!("  {}", s)));
                block.push("  }".to_string());
                block
            }),
        ],
        0..6,
    )
    .prop_map(|parts| parts.into_iter().flatten().collect())
}

proptest! {
    /// Without braces in strings the scanner finds the real closing line
    #[test]
    fn prop_balanced_component_end_is_exact(body in body_strategy(), trailing in 0usize..4) {
        let mut lines = vec!["const Widget = () => {".to_string()];
        lines.extend(body);
        lines.push("};".to_string());
        let true_end = lines.len() - 1;
        for i in 0..trailing {
            lines.push(format!("const after{} = {};", i, i));
        }
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();

        let end = BraceScanner::find_component_end(&refs, 0);
        prop_assert!(end.closed);
        prop_assert_eq!(end.line, true_end);
    }

    /// The reported line is always inside the input, whatever the text
    #[test]
    fn prop_end_stays_in_bounds(
        lines in prop::collection::vec("[a-z{}; ]{0,12}", 1..20),
        start in 0usize..25,
    ) {
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let end = BraceScanner::find_class_end(&refs, start);
        prop_assert!(end.line < refs.len());
        prop_assert!(end.line >= start.min(refs.len() - 1));
    }
}

/// A `{` inside a string literal is counted like any other brace, so the
/// detected end may diverge from the real one. This is expected behaviour.
#[test]
fn test_brace_in_string_literal_diverges() {
    let src = [
        "function Greeting() {",
        "  const open = \"{\";",
        "  return <p>{open}</p>;",
        "}",
        "",
        "function Other() {",
        "  return null;",
        "}",
    ];
    let end = BraceScanner::find_component_end(&src, 0);
    assert_ne!(end.line, 3, "string brace should shift the detected end");
    assert_eq!(end.line, 7);
    assert!(!end.closed);
}

/// A missing closing brace consumes the rest of the file
#[test]
fn test_missing_close_consumes_file() {
    let src = ["class Store {", "  items = [];", "", "export default Store;"];
    let end = BraceScanner::find_class_end(&src, 0);
    assert_eq!(end.line, 3);
    assert!(!end.closed);
}
