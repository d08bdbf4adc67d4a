//! Detection pattern tables
//!
//! Tables are immutable configuration. They can be deserialized from TOML or
//! JSON to replace the built-in set wholesale.

use serde::{Deserialize, Serialize};

/// Maps file extensions to a language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageRule {
    /// Language name
    pub language: String,
    /// Extensions without the leading dot
    pub extensions: Vec<String>,
    /// Icon identifier
    #[serde(default)]
    pub icon: String,
    /// Coarse role, e.g. "Frontend"
    #[serde(default)]
    pub purpose: String,
}

/// A framework is detected when a single file matches at least one of the
/// file patterns AND at least one of the content patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkRule {
    /// Framework name as reported
    pub name: String,
    /// Globs matched against the file path
    pub file_patterns: Vec<String>,
    /// Regexes matched against the file content
    pub content_patterns: Vec<String>,
}

/// Fallback classification by substring when no extension matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSniffRule {
    /// Language assigned on a hit
    pub language: String,
    /// Any of these substrings is a hit
    pub needles: Vec<String>,
}

/// Complete pattern configuration for a [`crate::LanguageDetector`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionTables {
    /// Extension rules
    pub languages: Vec<LanguageRule>,
    /// Framework rules, reported in this order
    pub frameworks: Vec<FrameworkRule>,
    /// Content sniffing rules, evaluated in order
    #[serde(default)]
    pub sniffing: Vec<ContentSniffRule>,
}

impl Default for DetectionTables {
    fn default() -> Self {
        Self::builtin()
    }
}

fn lang(language: &str, extensions: &[&str], icon: &str, purpose: &str) -> LanguageRule {
    LanguageRule {
        language: language.to_string(),
        extensions: extensions.iter().map(|e| e.to_string()).collect(),
        icon: icon.to_string(),
        purpose: purpose.to_string(),
    }
}

fn framework(name: &str, file_patterns: &[&str], content_patterns: &[&str]) -> FrameworkRule {
    FrameworkRule {
        name: name.to_string(),
        file_patterns: file_patterns.iter().map(|p| p.to_string()).collect(),
        content_patterns: content_patterns.iter().map(|p| p.to_string()).collect(),
    }
}

impl DetectionTables {
    /// The built-in tables
    pub fn builtin() -> Self {
        Self {
            languages: vec![
                lang("javascript", &["js", "jsx", "mjs", "cjs"], "js", "Frontend/Backend"),
                lang("typescript", &["ts", "tsx"], "ts", "Frontend/Backend"),
                lang("python", &["py", "pyw"], "py", "Backend"),
                lang("java", &["java"], "java", "Backend"),
                lang("kotlin", &["kt", "kts"], "kotlin", "Mobile/Backend"),
                lang("dart", &["dart"], "dart", "Mobile"),
                lang("swift", &["swift"], "swift", "Mobile"),
                lang("go", &["go"], "go", "Backend"),
                lang("rust", &["rs"], "rust", "Systems"),
                lang("ruby", &["rb"], "ruby", "Backend"),
                lang("php", &["php"], "php", "Backend"),
                lang("csharp", &["cs"], "csharp", "Backend"),
                lang("cpp", &["cpp", "cc", "cxx", "hpp"], "cpp", "Systems"),
                lang("c", &["c", "h"], "c", "Systems"),
                lang("html", &["html", "htm"], "html", "Markup"),
                lang("css", &["css"], "css", "Styling"),
                lang("scss", &["scss", "sass"], "sass", "Styling"),
                lang("less", &["less"], "less", "Styling"),
                lang("vue", &["vue"], "vue", "Frontend"),
                lang("svelte", &["svelte"], "svelte", "Frontend"),
                lang("json", &["json"], "json", "Configuration"),
                lang("yaml", &["yaml", "yml"], "yaml", "Configuration"),
                lang("markdown", &["md", "mdx"], "markdown", "Documentation"),
                lang("sql", &["sql"], "sql", "Database"),
                lang("shell", &["sh", "bash", "zsh"], "shell", "Tooling"),
            ],
            frameworks: vec![
                framework(
                    "react",
                    &["**/*.jsx", "**/*.tsx", "**/*.js", "**/*.ts"],
                    &[
                        r#"from\s+['"]react['"]"#,
                        r#"require\(\s*['"]react['"]\s*\)"#,
                        r"React\.(Component|createElement|useState)",
                    ],
                ),
                framework(
                    "nextjs",
                    &["**/next.config.*", "**/pages/**/*.*", "**/app/**/page.*"],
                    &[r#"from\s+['"]next/"#, r"getServerSideProps|getStaticProps", r"nextConfig"],
                ),
                framework(
                    "vue",
                    &["**/*.vue", "**/*.js", "**/*.ts"],
                    &[
                        r"<template>",
                        r#"from\s+['"]vue['"]"#,
                        r"\b(createApp|defineComponent)\s*\(",
                    ],
                ),
                framework(
                    "angular",
                    &["**/*.component.ts", "**/*.module.ts", "**/*.service.ts", "**/angular.json"],
                    &[r"@Component\s*\(", r"@NgModule\s*\(", r"@angular/core"],
                ),
                framework(
                    "svelte",
                    &["**/*.svelte", "**/svelte.config.*"],
                    &[r"<script", r"\$:", r"@sveltejs"],
                ),
                framework(
                    "express",
                    &[
                        "**/server.js",
                        "**/server.ts",
                        "**/app.js",
                        "**/app.ts",
                        "**/index.js",
                        "**/routes/**/*.js",
                        "**/routes/**/*.ts",
                    ],
                    &[
                        r#"require\(\s*['"]express['"]\s*\)"#,
                        r#"from\s+['"]express['"]"#,
                        r"express\.Router\(",
                    ],
                ),
                framework(
                    "nodejs",
                    &["**/*.js", "**/*.mjs", "**/*.cjs"],
                    &[r"\brequire\(", r"module\.exports", r"process\.env"],
                ),
                framework(
                    "django",
                    &["**/*.py"],
                    &[r"from\s+django", r"import\s+django", r"INSTALLED_APPS"],
                ),
                framework(
                    "flask",
                    &["**/*.py"],
                    &[r"from\s+flask\s+import", r"Flask\(\s*__name__"],
                ),
                framework(
                    "fastapi",
                    &["**/*.py"],
                    &[r"from\s+fastapi\s+import", r"FastAPI\("],
                ),
                framework(
                    "spring",
                    &["**/*.java", "**/*.kt", "**/pom.xml", "**/build.gradle*"],
                    &[r"@SpringBootApplication", r"org\.springframework"],
                ),
                framework(
                    "flutter",
                    &["**/*.dart", "**/pubspec.yaml"],
                    &[r"package:flutter/", r"sdk:\s*flutter"],
                ),
                framework(
                    "jetpack-compose",
                    &["**/*.kt"],
                    &[r"@Composable", r"androidx\.compose"],
                ),
                framework(
                    "laravel",
                    &["**/*.php", "**/composer.json"],
                    &[r"Illuminate\\", r"laravel/framework"],
                ),
                framework(
                    "rails",
                    &["**/*.rb", "**/Gemfile"],
                    &[r"Rails\.application", r"ActiveRecord::Base", r"gem\s+['\x22]rails['\x22]"],
                ),
                framework(
                    "tailwind",
                    &["**/tailwind.config.*", "**/*.css"],
                    &[r"@tailwind\s+", r"tailwindcss"],
                ),
            ],
            sniffing: vec![
                ContentSniffRule {
                    language: "python".to_string(),
                    needles: vec!["def ".to_string(), "import ".to_string()],
                },
                ContentSniffRule {
                    language: "javascript".to_string(),
                    needles: vec![
                        "function".to_string(),
                        "const ".to_string(),
                        "let ".to_string(),
                    ],
                },
            ],
        }
    }

    /// Find the rule for a language name
    pub fn language_rule(&self, language: &str) -> Option<&LanguageRule> {
        self.languages.iter().find(|rule| rule.language == language)
    }

    /// Find the rule for a framework name
    pub fn framework_rule(&self, name: &str) -> Option<&FrameworkRule> {
        self.frameworks.iter().find(|rule| rule.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_have_core_languages() {
        let tables = DetectionTables::builtin();
        assert!(tables.language_rule("javascript").is_some());
        assert!(tables.language_rule("typescript").is_some());
        assert!(tables.framework_rule("express").is_some());
    }

    #[test]
    fn test_sniffing_order_checks_python_first() {
        let tables = DetectionTables::builtin();
        assert_eq!(tables.sniffing[0].language, "python");
        assert_eq!(tables.sniffing[1].language, "javascript");
    }

    #[test]
    fn test_tables_roundtrip_through_json() {
        let tables = DetectionTables::builtin();
        let json = serde_json::to_string(&tables).unwrap();
        let back: DetectionTables = serde_json::from_str(&json).unwrap();
        assert_eq!(tables, back);
    }
}
