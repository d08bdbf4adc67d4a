//! Core data models for detection

use serde::{Deserialize, Serialize};

/// Prefix used by the archive reader for files whose content is not text
pub const BINARY_PLACEHOLDER_PREFIX: &str = "[Binary file: ";

const UNKNOWN: &str = "unknown";

/// A raw uploaded file.
///
/// Created once from the upload and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Path relative to the archive root, forward-slash separated
    pub path: String,
    /// Decoded text content, or a binary placeholder
    pub content: String,
    /// Content size in bytes
    pub size: usize,
    /// MIME type guessed from the path
    #[serde(rename = "type")]
    pub file_type: String,
}

impl ProjectFile {
    /// Create a project file, deriving size and MIME type
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into().replace('\\', "/");
        let content = content.into();
        let file_type = mime_guess::from_path(&path)
            .first_or_text_plain()
            .essence_str()
            .to_string();
        Self {
            size: content.len(),
            path,
            content,
            file_type,
        }
    }

    /// Create the placeholder entry for a binary file
    pub fn binary(path: impl Into<String>, size: usize) -> Self {
        let path = path.into().replace('\\', "/");
        let name = path.rsplit('/').next().unwrap_or(&path).to_string();
        Self {
            content: format!("{}{}]", BINARY_PLACEHOLDER_PREFIX, name),
            size,
            path,
            file_type: "application/octet-stream".to_string(),
        }
    }

    /// Whether this file carries the binary placeholder instead of content
    pub fn is_binary(&self) -> bool {
        self.content.starts_with(BINARY_PLACEHOLDER_PREFIX)
    }

    /// Final path segment
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Lowercased last extension of the file name, if any
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.path)
    }

    /// Number of lines in the content
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}

/// Lowercased last extension of a path's file name.
///
/// Dot-files such as `.env` have no extension.
pub fn extension_of(path: &str) -> Option<String> {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) if idx + 1 < name.len() => Some(name[idx + 1..].to_lowercase()),
        Some(_) => None,
    }
}

/// Language label assigned to a file
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Create a tag from a language name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().to_lowercase())
    }

    /// The tag for files no rule recognises
    pub fn unknown() -> Self {
        Self(UNKNOWN.to_string())
    }

    /// Whether this is the unknown tag
    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN
    }

    /// Language name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-language share of a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageStat {
    /// Language name
    pub language: String,
    /// Share of known-language lines, rounded to one decimal
    pub percentage: f64,
    /// Number of files in this language
    pub files: usize,
    /// Number of lines in this language
    pub lines: usize,
    /// Icon identifier for display
    pub icon: String,
    /// Coarse role of the language in a project
    pub purpose: String,
}

/// Summary of a project's languages and frameworks.
///
/// Recomputed wholesale on every analysis. Files classified `unknown` are
/// excluded from `total_files`, `total_lines` and every percentage, so the
/// percentages sum to roughly 100 over the known files only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechStackAnalysis {
    /// Language shares, largest first
    pub languages: Vec<LanguageStat>,
    /// Detected frameworks in table order
    pub frameworks: Vec<String>,
    /// Number of known-language files
    pub total_files: usize,
    /// Number of lines across known-language files
    pub total_lines: usize,
    /// Number of files excluded as unknown
    pub unknown_files: usize,
}

impl TechStackAnalysis {
    /// Share of a language, if present
    pub fn percentage_of(&self, language: &str) -> Option<f64> {
        self.languages
            .iter()
            .find(|stat| stat.language == language)
            .map(|stat| stat.percentage)
    }

    /// Language with the most lines, if any
    pub fn primary_language(&self) -> Option<&str> {
        self.languages.first().map(|stat| stat.language.as_str())
    }
}
