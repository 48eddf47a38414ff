//! Error types for SkipKV
//!
//! Only conditions the caller must react to are errors. A duplicate insert or
//! a lookup miss is an ordinary outcome and is reported through return values.

use thiserror::Error;

/// Result type alias using SkipKvError
pub type Result<T> = std::result::Result<T, SkipKvError>;

/// Unified error type for SkipKV operations
#[derive(Debug, Error)]
pub enum SkipKvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Persistence Errors
    // -------------------------------------------------------------------------
    /// A dump line that cannot be turned into a key/value pair.
    /// `load` skips these; the variant exists so the codec can say why.
    #[error("Malformed line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
