//! Error types for rst-comment-filter

use thiserror::Error;

/// Result type alias for filter operations
pub type Result<T> = std::result::Result<T, FilterError>;

/// Error types for filter operations
///
/// Cache corruption is deliberately absent: an unreadable cache is
/// recovered as an empty one (see `cache::CacheOrigin::Recovered`).
#[derive(Error, Debug)]
pub enum FilterError {
    /// Input file could not be opened or read
    #[error("Cannot open file '{path}': {reason}")]
    FileNotFound { path: String, reason: String },

    /// The markup engine rejected a comment
    #[error("Markup error: {0}")]
    Markup(String),

    /// The markup engine process could not be started
    #[error("Cannot start markup engine '{program}': {reason}")]
    EngineUnavailable { program: String, reason: String },

    /// The markup engine ran but did not produce a usable response
    #[error("Markup engine failed: {0}")]
    EngineFailed(String),

    /// Cache could not be written
    #[error("Cache error: {0}")]
    CacheError(String),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
