//! Error types for conversion, jobs and archives

use stackshift_config::ConfigError;
use stackshift_detect::DetectionError;
use stackshift_generation::GenerationError;
use thiserror::Error;

/// Errors raised by the conversion pipeline
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Detection error: {0}")]
    Detection(#[from] DetectionError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Neither frontend, backend nor mobile is set on the named stack
    #[error("The {0} tech stack names no primary framework")]
    NoPrimaryFramework(String),

    #[error("Unsupported target framework: {0}")]
    UnsupportedTarget(String),

    #[error("Could not determine the source framework of project {0}")]
    UnknownSourceFramework(String),

    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    #[error("Unsafe path in archive: {0}")]
    UnsafePath(String),

    #[error("Archive exceeds {limit}: {actual} > {max}")]
    LimitExceeded {
        limit: &'static str,
        actual: u64,
        max: u64,
    },

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Job {0} was cancelled")]
    Cancelled(String),
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConversionError>;
