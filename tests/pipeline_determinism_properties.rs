//! The whole pipeline is deterministic for a fixed input

use std::sync::Arc;

use proptest::prelude::*;
use stackshift_conversion::{InMemoryStore, JobRunner};
use stackshift_detect::{DetectionTables, LanguageDetector, ProjectFile};
use stackshift_generation::{TargetFramework, TranspileOptions};

fn component_source(name: &str, initial: i32) -> String {
    format!(
        "import React, {{ useState }} from 'react';\n\nexport const {name} = ({{ label = 'x' }}) => {{\n  const [value, setValue] = useState({initial});\n  return <div>{{label}}</div>;\n}};\n",
        name = name,
        initial = initial
    )
}

fn target() -> impl Strategy<Value = TargetFramework> {
    prop::sample::select(TargetFramework::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn analysis_is_stable(name in "[A-Z][a-z]{2,10}", initial in -1000i32..1000) {
        let detector = LanguageDetector::new(DetectionTables::builtin()).unwrap();
        let files = vec![
            ProjectFile::new(format!("src/{}.jsx", name), component_source(&name, initial)),
            ProjectFile::new("styles.css", ".root { color: red; }"),
        ];
        let first = serde_json::to_string(&detector.analyze_project(&files)).unwrap();
        let second = serde_json::to_string(&detector.analyze_project(&files)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn jobs_emit_identical_files(name in "[A-Z][a-z]{2,10}", initial in -1000i32..1000, to in target()) {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let options = TranspileOptions { readme_timestamp: false, ..TranspileOptions::default() };
        let runner = JobRunner::new(Arc::new(InMemoryStore::new())).unwrap().with_default_options(options);
        let files = vec![ProjectFile::new(format!("src/{}.jsx", name), component_source(&name, initial))];

        let (first, second) = runtime.block_on(async {
            let first = runner.run(runner.new_job("a", "react", to.as_str()), files.clone()).await.unwrap();
            let second = runner.run(runner.new_job("b", "react", to.as_str()), files.clone()).await.unwrap();
            (first, second)
        });

        let first = first.result.unwrap();
        let second = second.result.unwrap();
        prop_assert!(first.files.len() >= 2);
        prop_assert_eq!(first.files, second.files);
        prop_assert_eq!(first.warnings, second.warnings);
    }
}
