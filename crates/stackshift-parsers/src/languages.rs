//! Source languages the AST path understands

use serde::{Deserialize, Serialize};

/// Languages with a syntax-tree parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
    JavaScript,
    TypeScript,
    Css,
}

/// Which tree-sitter grammar a file is handed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// Plain TypeScript (no JSX)
    TypeScript,
    /// TypeScript with JSX, also used for all JavaScript flavours
    Tsx,
    /// Regex-based stylesheet extraction
    CssRegex,
}

impl SourceLanguage {
    /// File extensions routed to this language
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            SourceLanguage::JavaScript => &["js", "jsx", "mjs", "cjs"],
            SourceLanguage::TypeScript => &["ts", "tsx"],
            SourceLanguage::Css => &["css"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceLanguage::JavaScript => "javascript",
            SourceLanguage::TypeScript => "typescript",
            SourceLanguage::Css => "css",
        }
    }

    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "jsx" | "mjs" | "cjs" => Some(SourceLanguage::JavaScript),
            "ts" | "tsx" => Some(SourceLanguage::TypeScript),
            "css" => Some(SourceLanguage::Css),
            _ => None,
        }
    }

    /// Detect language from a file path
    pub fn from_path(path: &str) -> Option<Self> {
        stackshift_detect::models::extension_of(path).and_then(|ext| Self::from_extension(&ext))
    }
}

impl Grammar {
    /// Pick the grammar for a path. `.ts` gets the non-JSX grammar so that
    /// angle-bracket casts parse; everything else scripted goes through TSX.
    pub fn for_path(path: &str) -> Option<Self> {
        let ext = stackshift_detect::models::extension_of(path)?;
        match ext.as_str() {
            "ts" => Some(Grammar::TypeScript),
            "js" | "jsx" | "mjs" | "cjs" | "tsx" => Some(Grammar::Tsx),
            "css" => Some(Grammar::CssRegex),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SourceLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "javascript" | "js" => Ok(SourceLanguage::JavaScript),
            "typescript" | "ts" => Ok(SourceLanguage::TypeScript),
            "css" => Ok(SourceLanguage::Css),
            _ => Err(format!("Unsupported language: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_path() {
        assert_eq!(SourceLanguage::from_path("src/App.jsx"), Some(SourceLanguage::JavaScript));
        assert_eq!(SourceLanguage::from_path("src/App.TSX"), Some(SourceLanguage::TypeScript));
        assert_eq!(SourceLanguage::from_path("a/b.css"), Some(SourceLanguage::Css));
        assert_eq!(SourceLanguage::from_path("logo.png"), None);
        assert_eq!(SourceLanguage::from_path("README.md"), None);
    }

    #[test]
    fn test_grammar_selection() {
        assert_eq!(Grammar::for_path("x.ts"), Some(Grammar::TypeScript));
        assert_eq!(Grammar::for_path("x.tsx"), Some(Grammar::Tsx));
        assert_eq!(Grammar::for_path("x.js"), Some(Grammar::Tsx));
        assert_eq!(Grammar::for_path("x.cjs"), Some(Grammar::Tsx));
        assert_eq!(Grammar::for_path("x.css"), Some(Grammar::CssRegex));
        assert_eq!(Grammar::for_path("x.scss"), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("TS".parse::<SourceLanguage>(), Ok(SourceLanguage::TypeScript));
        assert!("cobol".parse::<SourceLanguage>().is_err());
    }
}
