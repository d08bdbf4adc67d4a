//! Data models for emission

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Frameworks the emitters can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFramework {
    Flutter,
    Kotlin,
    TypeScript,
    Vue,
    Angular,
}

impl TargetFramework {
    pub const ALL: [TargetFramework; 5] = [
        TargetFramework::Flutter,
        TargetFramework::Kotlin,
        TargetFramework::TypeScript,
        TargetFramework::Vue,
        TargetFramework::Angular,
    ];

    /// Parse a user-supplied target name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "flutter" | "dart" => Some(TargetFramework::Flutter),
            "kotlin" | "android" | "jetpack-compose" => Some(TargetFramework::Kotlin),
            "typescript" | "react" | "ts" => Some(TargetFramework::TypeScript),
            "vue" => Some(TargetFramework::Vue),
            "angular" => Some(TargetFramework::Angular),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetFramework::Flutter => "flutter",
            TargetFramework::Kotlin => "kotlin",
            TargetFramework::TypeScript => "typescript",
            TargetFramework::Vue => "vue",
            TargetFramework::Angular => "angular",
        }
    }

    /// Language of emitted component files
    pub fn language(&self) -> &'static str {
        match self {
            TargetFramework::Flutter => "dart",
            TargetFramework::Kotlin => "kotlin",
            TargetFramework::TypeScript | TargetFramework::Angular => "typescript",
            TargetFramework::Vue => "vue",
        }
    }

    /// Comment syntax of emitted component files
    pub fn comment_syntax(&self) -> CommentSyntax {
        match self {
            TargetFramework::Vue => CommentSyntax::Html,
            _ => CommentSyntax::Line,
        }
    }
}

/// How a one-line comment is written in an emitted file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentSyntax {
    /// `// text`
    Line,
    /// `<!-- text -->`
    Html,
    /// `/* text */`
    Block,
    /// `# text`
    Hash,
}

impl CommentSyntax {
    pub fn wrap(&self, text: &str) -> String {
        match self {
            CommentSyntax::Line => format!("// {}", text),
            CommentSyntax::Html => format!("<!-- {} -->", text),
            CommentSyntax::Block => format!("/* {} */", text),
            CommentSyntax::Hash => format!("# {}", text),
        }
    }
}

impl fmt::Display for TargetFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TargetFramework {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| GenerationError::UnsupportedTarget(s.to_string()))
    }
}

/// Role of an emitted file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Component,
    Function,
    Style,
    Config,
    Entry,
    Documentation,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileType::Component => "component",
            FileType::Function => "function",
            FileType::Style => "style",
            FileType::Config => "config",
            FileType::Entry => "entry",
            FileType::Documentation => "documentation",
        };
        write!(f, "{}", name)
    }
}

/// An emitted output file. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedFile {
    /// Source file this was derived from; empty for project files
    pub original_path: String,
    pub new_path: String,
    pub content: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub language: String,
    pub line_count: usize,
}

impl ConvertedFile {
    pub fn new(
        original_path: impl Into<String>,
        new_path: impl Into<String>,
        content: String,
        file_type: FileType,
        language: impl Into<String>,
    ) -> Self {
        Self {
            original_path: original_path.into(),
            new_path: new_path.into(),
            line_count: content.lines().count(),
            content,
            file_type,
            language: language.into(),
        }
    }

    /// A project-level file with no source counterpart
    pub fn project(new_path: impl Into<String>, content: String, file_type: FileType, language: impl Into<String>) -> Self {
        Self::new(String::new(), new_path, content, file_type, language)
    }
}

/// A per-node emission failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionError {
    pub file: String,
    pub node: String,
    pub message: String,
}

/// Outcome of a transpile run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// True when at least one file was produced
    pub success: bool,
    pub files: Vec<ConvertedFile>,
    pub errors: Vec<EmissionError>,
    pub warnings: Vec<String>,
}

impl ConversionResult {
    /// Seal a result: success means any output at all
    pub fn from_parts(files: Vec<ConvertedFile>, errors: Vec<EmissionError>, warnings: Vec<String>) -> Self {
        Self {
            success: !files.is_empty(),
            files,
            errors,
            warnings,
        }
    }

    pub fn total_lines(&self) -> usize {
        self.files.iter().map(|f| f.line_count).sum()
    }

    pub fn file(&self, new_path: &str) -> Option<&ConvertedFile> {
        self.files.iter().find(|f| f.new_path == new_path)
    }
}

/// Caller-supplied knobs for emission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranspileOptions {
    pub project_name: String,
    /// Kotlin package / application id
    pub package_id: String,
    /// Start every emitted file with a comment naming its source
    pub include_source_comments: bool,
    /// Embed the generation time in README.md
    pub readme_timestamp: bool,
}

impl Default for TranspileOptions {
    fn default() -> Self {
        Self {
            project_name: "converted_app".to_string(),
            package_id: "com.example.app".to_string(),
            include_source_comments: true,
            readme_timestamp: true,
        }
    }
}

/// Everything an emitter may look at besides the node itself
#[derive(Debug, Clone, Default)]
pub struct EmitContext {
    pub from_framework: String,
    pub options: TranspileOptions,
    /// Components emitted so far, in order; set before project files are built
    pub component_names: Vec<String>,
}

impl EmitContext {
    pub fn new(from_framework: impl Into<String>, options: TranspileOptions) -> Self {
        Self {
            from_framework: from_framework.into(),
            options,
            component_names: Vec::new(),
        }
    }

    /// `com.example.app` → `com/example/app`
    pub fn package_path(&self) -> String {
        self.options.package_id.replace('.', "/")
    }

    /// Leading comment for a file converted from `source`, or empty
    pub fn source_comment(&self, syntax: CommentSyntax, source: &str) -> String {
        if self.options.include_source_comments && !source.is_empty() {
            syntax.wrap(&format!("Converted from {}", source))
        } else {
            String::new()
        }
    }
}
