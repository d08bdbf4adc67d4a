//! Configuration types

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const MIB: u64 = 1024 * 1024;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct StackshiftConfig {
    /// Upload limits
    pub limits: LimitsConfig,
    /// Detection table override
    pub detection: DetectionConfig,
    /// Emission options
    pub output: OutputConfig,
    /// Parser selection
    pub parsing: ParsingConfig,
}

/// Bounds enforced when reading an uploaded archive
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Larger entries become binary placeholders
    pub max_file_size_bytes: u64,
    /// Archives with more entries are rejected
    pub max_files: usize,
    /// Archives whose entries sum to more are rejected
    pub max_total_bytes: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 5 * MIB,
            max_files: 5000,
            max_total_bytes: 50 * MIB,
        }
    }
}

/// Detection settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct DetectionConfig {
    /// TOML file holding a full set of detection tables
    pub tables_path: Option<PathBuf>,
}

/// Emission settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    pub project_name: String,
    pub package_id: String,
    pub include_source_comments: bool,
    pub readme_timestamp: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            project_name: "converted_app".to_string(),
            package_id: "com.example.app".to_string(),
            include_source_comments: true,
            readme_timestamp: true,
        }
    }
}

/// Which parser extracts components
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParsingMode {
    /// tree-sitter and UIR
    #[default]
    Ast,
    /// Line-oriented fallback
    Heuristic,
}

impl fmt::Display for ParsingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsingMode::Ast => write!(f, "ast"),
            ParsingMode::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// Parser settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ParsingConfig {
    pub mode: ParsingMode,
}
