//! Error types for detection

use thiserror::Error;

/// Result type for detection operations
pub type Result<T> = std::result::Result<T, DetectionError>;

/// Errors raised while building a detector.
///
/// Detection itself never fails: absence of evidence yields empty results.
/// Only compiling a set of [`crate::DetectionTables`] can go wrong.
#[derive(Debug, Error)]
pub enum DetectionError {
    /// A framework content regex or file glob did not compile
    #[error("Invalid pattern '{pattern}' for {owner}: {reason}")]
    InvalidPattern {
        /// Framework or rule that owns the pattern
        owner: String,
        /// The offending pattern text
        pattern: String,
        /// Compiler message
        reason: String,
    },

    /// Two language rules claim the same extension
    #[error("Extension '.{extension}' is claimed by both {first} and {second}")]
    DuplicateExtension {
        /// Extension without the leading dot
        extension: String,
        /// Language registered first
        first: String,
        /// Language registered second
        second: String,
    },
}
