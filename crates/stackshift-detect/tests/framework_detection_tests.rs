//! Framework detection against realistic project layouts

use stackshift_detect::{DetectionTables, LanguageDetector, ProjectFile};

fn detector() -> LanguageDetector {
    LanguageDetector::default()
}

#[test]
fn test_express_server_is_detected() {
    let files = vec![ProjectFile::new(
        "server.js",
        "const express = require('express');\nconst app = express();\napp.listen(3000);\n",
    )];
    let frameworks = detector().detect_frameworks(&files);
    assert!(frameworks.contains(&"express".to_string()));
    // nodejs is satisfied independently by the same file's require() call
    assert!(frameworks.contains(&"nodejs".to_string()));
}

#[test]
fn test_unconventionally_named_server_is_missed() {
    let files = vec![ProjectFile::new(
        "backend/http-entry.js",
        "const express = require('express');\nexpress().listen(8080);\n",
    )];
    let frameworks = detector().detect_frameworks(&files);
    assert!(!frameworks.contains(&"express".to_string()));
}

#[test]
fn test_react_project() {
    let files = vec![
        ProjectFile::new(
            "src/App.jsx",
            "import React, { useState } from 'react';\nexport default function App() { return <div/>; }\n",
        ),
        ProjectFile::new("src/index.css", "body { margin: 0; }\n"),
        ProjectFile::new("README.md", "# demo\n"),
    ];
    let analysis = detector().analyze_project(&files);
    assert_eq!(analysis.frameworks, vec!["react".to_string()]);
    assert_eq!(analysis.total_files, 3);
    assert_eq!(analysis.unknown_files, 0);
    let total: f64 = analysis.languages.iter().map(|l| l.percentage).sum();
    assert!((total - 100.0).abs() < 0.2);
}

#[test]
fn test_angular_component() {
    let files = vec![ProjectFile::new(
        "src/app/hero/hero.component.ts",
        "import { Component } from '@angular/core';\n@Component({ selector: 'app-hero' })\nexport class HeroComponent {}\n",
    )];
    let frameworks = detector().detect_frameworks(&files);
    assert!(frameworks.contains(&"angular".to_string()));
}

#[test]
fn test_flutter_pubspec() {
    let files = vec![ProjectFile::new(
        "pubspec.yaml",
        "name: demo\ndependencies:\n  flutter:\n    sdk: flutter\n",
    )];
    assert_eq!(detector().detect_frameworks(&files), vec!["flutter".to_string()]);
}

#[test]
fn test_binary_placeholders_are_unknown() {
    let files = vec![
        ProjectFile::binary("assets/logo.png", 1024),
        ProjectFile::new("main.py", "print('hi')\n"),
    ];
    let analysis = detector().analyze_project(&files);
    assert_eq!(analysis.unknown_files, 1);
    assert_eq!(analysis.percentage_of("python"), Some(100.0));
}

#[test]
fn test_tables_load_from_toml() {
    let toml_src = r#"
        [[languages]]
        language = "elixir"
        extensions = ["ex", "exs"]
        purpose = "Backend"

        [[frameworks]]
        name = "phoenix"
        file_patterns = ["**/*.ex"]
        content_patterns = ["use Phoenix\\."]
    "#;
    let tables: DetectionTables = toml::from_str(toml_src).unwrap();
    let detector = LanguageDetector::new(tables).unwrap();
    let files = vec![ProjectFile::new(
        "lib/web/router.ex",
        "defmodule Web.Router do\n  use Phoenix.Router\nend\n",
    )];
    let analysis = detector.analyze_project(&files);
    assert_eq!(analysis.frameworks, vec!["phoenix".to_string()]);
    assert_eq!(analysis.languages[0].language, "elixir");
}
