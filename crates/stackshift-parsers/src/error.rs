//! Parser error types, diagnostics and partial results

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parser operation errors
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Language not supported for {path}")]
    UnsupportedLanguage { path: String },

    #[error("Parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Tree-sitter error: {message}")]
    TreeSitterError { message: String },

    #[error("Traversal error: {message}")]
    TraversalError { message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for parser operations
pub type ParserResult<T> = std::result::Result<T, ParserError>;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Info => write!(f, "INFO"),
            DiagnosticSeverity::Warning => write!(f, "WARN"),
            DiagnosticSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// A non-fatal finding attached to a parse result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub file: String,
    /// 1-based line, when known
    pub line: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: DiagnosticSeverity, file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            file: file.into(),
            line: None,
            message: message.into(),
        }
    }

    pub fn info(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Info, file, message)
    }

    pub fn warning(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, file, message)
    }

    pub fn error(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Error, file, message)
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "[{}] {}:{}: {}", self.severity, self.file, line, self.message),
            None => write!(f, "[{}] {}: {}", self.severity, self.file, self.message),
        }
    }
}

/// A best-effort value together with everything that went wrong producing it.
///
/// An empty value with no diagnostics means "nothing found"; an empty value
/// with diagnostics means "something was there but could not be read".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialResult<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> PartialResult<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostics(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Whether any diagnostic is at warning level or above
    pub fn is_degraded(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity >= DiagnosticSeverity::Warning)
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> PartialResult<U> {
        PartialResult {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }

    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.value, self.diagnostics)
    }
}

impl<T: Default> Default for PartialResult<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
