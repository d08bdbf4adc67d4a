//! Error types for code emission

use thiserror::Error;

/// Errors that can occur while emitting target files
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Template not registered
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// A built-in template failed to compile
    #[error("Invalid template {name}: {message}")]
    InvalidTemplate {
        /// Template name
        name: String,
        /// Compiler message
        message: String,
    },

    /// Template rendering error
    #[error("Render error in {template}: {message}")]
    RenderError {
        /// Template name
        template: String,
        /// Renderer message
        message: String,
    },

    /// Target framework has no emitter
    #[error("Unsupported target framework: {0}")]
    UnsupportedTarget(String),

    /// A node could not be emitted
    #[error("Cannot emit {node}: {message}")]
    EmissionFailed {
        /// Node name
        node: String,
        /// Reason
        message: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for generation operations
pub type Result<T> = std::result::Result<T, GenerationError>;
