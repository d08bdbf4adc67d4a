//! Tech-stack request and result types

use serde::{Deserialize, Serialize};
use stackshift_generation::{ConvertedFile, EmissionError, TranspileOptions};

/// The frameworks a project is built on, one slot per layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechStack {
    pub frontend: Option<String>,
    pub backend: Option<String>,
    pub database: Option<String>,
    pub mobile: Option<String>,
}

impl TechStack {
    /// Stack with only a frontend framework
    pub fn frontend(name: impl Into<String>) -> Self {
        Self {
            frontend: Some(name.into()),
            ..Self::default()
        }
    }

    /// Stack with only a mobile framework
    pub fn mobile(name: impl Into<String>) -> Self {
        Self {
            mobile: Some(name.into()),
            ..Self::default()
        }
    }

    /// First present of frontend, backend and mobile.
    ///
    /// `database` never drives conversion.
    pub fn primary_framework(&self) -> Option<&str> {
        [&self.frontend, &self.backend, &self.mobile]
            .into_iter()
            .flatten()
            .map(|name| name.trim())
            .find(|name| !name.is_empty())
    }
}

/// What to convert from and to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechStackConversionRequest {
    pub current_stack: TechStack,
    pub target_stack: TechStack,
    pub options: TranspileOptions,
}

impl TechStackConversionRequest {
    pub fn new(current_stack: TechStack, target_stack: TechStack) -> Self {
        Self {
            current_stack,
            target_stack,
            options: TranspileOptions::default(),
        }
    }
}

/// Positional pairing of an original file with a converted file.
///
/// Line `i` of the original is paired with line `i` of the output for
/// `i in 1..=min(original, converted)`. The pairing carries no meaning
/// beyond position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineMapping {
    pub original_path: String,
    pub new_path: String,
    /// `(original_line, converted_line)`, both 1-based
    pub lines: Vec<(usize, usize)>,
}

impl LineMapping {
    pub fn positional(
        original_path: impl Into<String>,
        new_path: impl Into<String>,
        original_lines: usize,
        converted_lines: usize,
    ) -> Self {
        Self {
            original_path: original_path.into(),
            new_path: new_path.into(),
            lines: (1..=original_lines.min(converted_lines)).map(|i| (i, i)).collect(),
        }
    }
}

/// Outcome of a whole-stack conversion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechStackConversionResult {
    pub success: bool,
    pub files: Vec<ConvertedFile>,
    pub errors: Vec<EmissionError>,
    pub warnings: Vec<String>,
    pub line_mappings: Vec<LineMapping>,
}

impl TechStackConversionResult {
    /// File name recorded on pipeline-level failures
    pub const SYSTEM_FILE: &'static str = "system";

    /// A failed result carrying one pipeline-level error
    pub fn system_failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            errors: vec![EmissionError {
                file: Self::SYSTEM_FILE.to_string(),
                node: String::new(),
                message: message.into(),
            }],
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_framework_order() {
        let stack = TechStack {
            frontend: None,
            backend: Some("express".into()),
            database: Some("postgres".into()),
            mobile: Some("flutter".into()),
        };
        assert_eq!(stack.primary_framework(), Some("express"));

        let stack = TechStack {
            frontend: Some("react".into()),
            ..stack
        };
        assert_eq!(stack.primary_framework(), Some("react"));

        let database_only = TechStack {
            database: Some("mongodb".into()),
            ..TechStack::default()
        };
        assert_eq!(database_only.primary_framework(), None);
        assert_eq!(TechStack::frontend("  ").primary_framework(), None);
    }

    #[test]
    fn test_positional_mapping() {
        let mapping = LineMapping::positional("App.jsx", "src/components/App.tsx", 3, 10);
        assert_eq!(mapping.lines, vec![(1, 1), (2, 2), (3, 3)]);
        assert!(LineMapping::positional("a", "b", 0, 4).lines.is_empty());
    }

    #[test]
    fn test_system_failure() {
        let result = TechStackConversionResult::system_failure("boom");
        assert!(!result.success);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].file, "system");
    }
}
