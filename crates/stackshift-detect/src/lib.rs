#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Stackshift detection
//!
//! Classifies uploaded project files by language and reports the frameworks a
//! project appears to use. Detection is heuristic: languages come from file
//! extensions (with a crude content sniff as fallback) and frameworks from a
//! pair of glob/regex pattern sets evaluated per file.
//!
//! All pattern data lives in [`DetectionTables`], which is plain configuration
//! injected into [`LanguageDetector`] at construction time.

pub mod detector;
pub mod error;
pub mod models;
pub mod tables;

pub use detector::LanguageDetector;
pub use error::{DetectionError, Result};
pub use models::{LanguageStat, LanguageTag, ProjectFile, TechStackAnalysis, BINARY_PLACEHOLDER_PREFIX};
pub use tables::{ContentSniffRule, DetectionTables, FrameworkRule, LanguageRule};
