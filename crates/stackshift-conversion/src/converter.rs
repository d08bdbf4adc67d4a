//! Whole-stack conversion through the line-oriented parser

use std::collections::HashMap;

use stackshift_detect::ProjectFile;
use stackshift_generation::{ConvertedFile, EmissionError, FileType, TargetFramework, Transpiler};
use stackshift_parsers::{DiagnosticSeverity, LineParser, ParsedProjectStructure, UIRNode};
use tracing::{debug, info, warn};

use crate::error::{ConversionError, Result};
use crate::mapping::component_to_uir;
use crate::stack::{LineMapping, TechStackConversionRequest, TechStackConversionResult};

/// Converts a project from one tech stack to another
#[derive(Debug, Clone)]
pub struct TechStackConverter {
    line_parser: LineParser,
    transpiler: Transpiler,
}

impl TechStackConverter {
    /// Converter with the built-in emitters
    pub fn new() -> Result<Self> {
        Ok(Self::with_transpiler(Transpiler::new()?))
    }

    pub fn with_transpiler(transpiler: Transpiler) -> Self {
        Self {
            line_parser: LineParser::new(),
            transpiler,
        }
    }

    /// Convert every UI component to the target stack's primary framework.
    ///
    /// Never returns an error: a failure anywhere in the pipeline becomes a
    /// result with `success == false` and a single `system` error.
    pub fn convert_tech_stack(
        &self,
        request: &TechStackConversionRequest,
        files: &[ProjectFile],
    ) -> TechStackConversionResult {
        match self.try_convert(request, files) {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Tech stack conversion failed");
                TechStackConversionResult::system_failure(e.to_string())
            }
        }
    }

    fn try_convert(
        &self,
        request: &TechStackConversionRequest,
        files: &[ProjectFile],
    ) -> Result<TechStackConversionResult> {
        let from = request
            .current_stack
            .primary_framework()
            .ok_or_else(|| ConversionError::NoPrimaryFramework("current".to_string()))?;
        let to = request
            .target_stack
            .primary_framework()
            .ok_or_else(|| ConversionError::NoPrimaryFramework("target".to_string()))?;
        if TargetFramework::from_name(to).is_none() {
            return Err(ConversionError::UnsupportedTarget(to.to_string()));
        }

        let (structure, diagnostics) = self.line_parser.parse_project(files, from).into_parts();
        let mut warnings: Vec<String> = diagnostics
            .iter()
            .filter(|d| d.severity >= DiagnosticSeverity::Warning)
            .map(ToString::to_string)
            .collect();

        let nodes: Vec<UIRNode> = structure
            .ui
            .components
            .iter()
            .map(|component| component_to_uir(component, from))
            .collect();
        debug!(components = nodes.len(), "Mapped components to UIR");

        let converted = self.transpiler.emit_project(&nodes, from, to, &request.options);
        warnings.extend(converted.warnings);
        warnings.extend(unconverted_warnings(&structure));

        let line_mappings = line_mappings(files, &converted.files);
        let mut result = TechStackConversionResult {
            success: true,
            files: converted.files,
            errors: converted.errors,
            warnings,
            line_mappings,
        };
        if result.files.is_empty() {
            result.success = false;
            result.errors.push(EmissionError {
                file: String::new(),
                node: String::new(),
                message: "no files were generated".to_string(),
            });
        }

        info!(
            from = from,
            to = to,
            files = result.files.len(),
            errors = result.errors.len(),
            "Tech stack conversion complete"
        );
        Ok(result)
    }
}

/// Backend services, database models and routes are counted but never translated
pub(crate) fn unconverted_warnings(structure: &ParsedProjectStructure) -> Vec<String> {
    [
        ("backend services", structure.logic.services.len()),
        ("database models", structure.data.models.len()),
        ("routes", structure.routes.routes.len()),
    ]
    .into_iter()
    .filter(|(_, count)| *count > 0)
    .map(|(category, count)| format!("{} {} were not converted", count, category))
    .collect()
}

fn line_mappings(originals: &[ProjectFile], converted: &[ConvertedFile]) -> Vec<LineMapping> {
    let line_counts: HashMap<&str, usize> = originals
        .iter()
        .map(|f| (f.path.as_str(), f.line_count()))
        .collect();
    converted
        .iter()
        .filter(|f| f.file_type == FileType::Component)
        .filter_map(|f| {
            let original = line_counts.get(f.original_path.as_str())?;
            Some(LineMapping::positional(&f.original_path, &f.new_path, *original, f.line_count))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::TechStack;

    fn request(from: TechStack, to: TechStack) -> TechStackConversionRequest {
        let mut request = TechStackConversionRequest::new(from, to);
        request.options.readme_timestamp = false;
        request
    }

    #[test]
    fn test_react_to_flutter() {
        let files = vec![ProjectFile::new(
            "src/Counter.jsx",
            "import React, { useState } from 'react';\n\nconst Counter = () => {\n  const [count, setCount] = useState(0);\n  return <div>{count}</div>;\n};\n\nexport default Counter;\n",
        )];
        let converter = TechStackConverter::new().unwrap();
        let result = converter.convert_tech_stack(
            &request(TechStack::frontend("react"), TechStack::mobile("flutter")),
            &files,
        );

        assert!(result.success, "{:?}", result.errors);
        let widget = result
            .files
            .iter()
            .find(|f| f.new_path == "lib/widgets/counter_widget.dart")
            .unwrap();
        assert!(widget.content.contains("StatefulWidget"));
        assert!(widget.content.contains("int count = 0;"));
        assert!(result.files.iter().any(|f| f.new_path == "pubspec.yaml"));

        assert_eq!(result.line_mappings.len(), 1);
        let mapping = &result.line_mappings[0];
        assert_eq!(mapping.original_path, "src/Counter.jsx");
        assert_eq!(mapping.lines.len(), 8.min(widget.line_count));
        assert_eq!(mapping.lines[0], (1, 1));
    }

    #[test]
    fn test_missing_primary_framework_is_system_error() {
        let converter = TechStackConverter::new().unwrap();
        let database_only = TechStack {
            database: Some("postgres".into()),
            ..TechStack::default()
        };
        let result = converter.convert_tech_stack(&request(database_only, TechStack::frontend("vue")), &[]);
        assert!(!result.success);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].file, "system");
        assert!(result.errors[0].message.contains("current"));
    }

    #[test]
    fn test_unsupported_target_is_system_error() {
        let converter = TechStackConverter::new().unwrap();
        let result = converter.convert_tech_stack(
            &request(TechStack::frontend("react"), TechStack::frontend("svelte")),
            &[],
        );
        assert!(!result.success);
        assert_eq!(result.errors[0].file, "system");
        assert!(result.errors[0].message.contains("svelte"));
    }

    #[test]
    fn test_backend_items_are_reported() {
        let files = vec![
            ProjectFile::new(
                "server.js",
                "const express = require('express');\nconst app = express();\napp.get('/users', listUsers);\napp.listen(3000);\n",
            ),
            ProjectFile::new(
                "src/models/User.ts",
                "export interface User {\n  id: number;\n  name: string;\n}\n",
            ),
        ];
        let converter = TechStackConverter::new().unwrap();
        let result = converter.convert_tech_stack(
            &request(TechStack::frontend("react"), TechStack::frontend("vue")),
            &files,
        );
        assert!(result.success);
        assert!(result.warnings.iter().any(|w| w == "1 routes were not converted"));
        assert!(result.warnings.iter().any(|w| w == "1 database models were not converted"));
        assert!(result.line_mappings.is_empty());
    }
}
