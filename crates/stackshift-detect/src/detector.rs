//! Language and framework detector

use std::collections::{BTreeMap, HashMap, HashSet};

use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::RegexSet;
use tracing::debug;

use crate::{
    error::{DetectionError, Result},
    models::{LanguageStat, LanguageTag, ProjectFile, TechStackAnalysis},
    tables::{ContentSniffRule, DetectionTables, LanguageRule},
};

/// A framework rule with its patterns compiled
#[derive(Debug)]
struct CompiledFramework {
    name: String,
    files: GlobSet,
    content: RegexSet,
}

impl CompiledFramework {
    fn matches(&self, file: &ProjectFile) -> bool {
        self.files.is_match(&file.path) && self.content.is_match(&file.content)
    }
}

/// Classifies files by language and projects by framework.
///
/// Pure over its inputs: the same file list always yields the same analysis.
#[derive(Debug)]
pub struct LanguageDetector {
    by_extension: HashMap<String, usize>,
    languages: Vec<LanguageRule>,
    frameworks: Vec<CompiledFramework>,
    sniffing: Vec<ContentSniffRule>,
}

impl LanguageDetector {
    /// Compile a detector from pattern tables
    pub fn new(tables: DetectionTables) -> Result<Self> {
        let mut by_extension = HashMap::new();
        for (idx, rule) in tables.languages.iter().enumerate() {
            for ext in &rule.extensions {
                let ext = ext.trim_start_matches('.').to_lowercase();
                if let Some(previous) = by_extension.insert(ext.clone(), idx) {
                    return Err(DetectionError::DuplicateExtension {
                        extension: ext,
                        first: tables.languages[previous].language.clone(),
                        second: rule.language.clone(),
                    });
                }
            }
        }

        let mut frameworks = Vec::with_capacity(tables.frameworks.len());
        for rule in &tables.frameworks {
            let mut builder = GlobSetBuilder::new();
            for pattern in &rule.file_patterns {
                let glob = Glob::new(pattern).map_err(|e| DetectionError::InvalidPattern {
                    owner: rule.name.clone(),
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
                builder.add(glob);
            }
            let files = builder.build().map_err(|e| DetectionError::InvalidPattern {
                owner: rule.name.clone(),
                pattern: rule.file_patterns.join(", "),
                reason: e.to_string(),
            })?;
            let content =
                RegexSet::new(&rule.content_patterns).map_err(|e| DetectionError::InvalidPattern {
                    owner: rule.name.clone(),
                    pattern: rule.content_patterns.join(" | "),
                    reason: e.to_string(),
                })?;
            frameworks.push(CompiledFramework {
                name: rule.name.clone(),
                files,
                content,
            });
        }

        Ok(Self {
            by_extension,
            languages: tables.languages,
            frameworks,
            sniffing: tables.sniffing,
        })
    }

    /// Classify a single file.
    ///
    /// Extension table first, then content sniffing, then `unknown`.
    pub fn detect_language(&self, filename: &str, content: &str) -> LanguageTag {
        if let Some(rule) = self.rule_for_path(filename) {
            return LanguageTag::new(&rule.language);
        }

        for rule in &self.sniffing {
            if rule.needles.iter().any(|needle| content.contains(needle.as_str())) {
                return LanguageTag::new(&rule.language);
            }
        }

        LanguageTag::unknown()
    }

    /// Frameworks for which some file matches both a file pattern and a
    /// content pattern. Reported in table order, each at most once.
    pub fn detect_frameworks(&self, files: &[ProjectFile]) -> Vec<String> {
        let mut detected = Vec::new();
        for framework in &self.frameworks {
            if let Some(file) = files.iter().find(|file| framework.matches(file)) {
                debug!("Detected {} via {}", framework.name, file.path);
                detected.push(framework.name.clone());
            }
        }
        detected
    }

    /// Aggregate language shares and frameworks for a project
    pub fn analyze_project(&self, files: &[ProjectFile]) -> TechStackAnalysis {
        // BTreeMap keeps iteration order stable before the final sort
        let mut groups: BTreeMap<LanguageTag, (usize, usize)> = BTreeMap::new();
        let mut unknown_files = 0;

        for file in files {
            let language = self.detect_language(&file.path, &file.content);
            if language.is_unknown() {
                unknown_files += 1;
                continue;
            }
            let entry = groups.entry(language).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += file.line_count();
        }

        let total_lines: usize = groups.values().map(|(_, lines)| lines).sum();
        let total_files: usize = groups.values().map(|(count, _)| count).sum();

        let mut languages: Vec<LanguageStat> = groups
            .into_iter()
            .map(|(language, (count, lines))| {
                let rule = self.languages.iter().find(|r| r.language == language.as_str());
                LanguageStat {
                    percentage: percentage(lines, total_lines),
                    files: count,
                    lines,
                    icon: rule.map(|r| r.icon.clone()).unwrap_or_default(),
                    purpose: rule.map(|r| r.purpose.clone()).unwrap_or_default(),
                    language: language.as_str().to_string(),
                }
            })
            .collect();

        languages.sort_by(|a, b| {
            b.percentage
                .total_cmp(&a.percentage)
                .then_with(|| a.language.cmp(&b.language))
        });

        let frameworks = self.detect_frameworks(files);
        debug!(
            "Analyzed {} files: {} languages, {} frameworks, {} unknown",
            files.len(),
            languages.len(),
            frameworks.len(),
            unknown_files
        );

        TechStackAnalysis {
            languages,
            frameworks,
            total_files,
            total_lines,
            unknown_files,
        }
    }

    /// Names of all frameworks this detector knows
    pub fn known_frameworks(&self) -> HashSet<&str> {
        self.frameworks.iter().map(|f| f.name.as_str()).collect()
    }

    fn rule_for_path(&self, path: &str) -> Option<&LanguageRule> {
        let ext = crate::models::extension_of(path)?;
        self.by_extension.get(&ext).map(|&idx| &self.languages[idx])
    }
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new(DetectionTables::builtin()).expect("built-in detection tables compile")
    }
}

fn percentage(lines: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (lines as f64 / total as f64 * 1000.0).round() / 10.0
}
