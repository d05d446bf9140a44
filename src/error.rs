//! Error types for the json-stats engine
use thiserror::Error;

/// Main error type for json-stats operations
#[derive(Error, Debug)]
pub enum StatsError {
    /// Configuration is invalid or incomplete
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A dotted field path could not be parsed
    #[error("Invalid field path '{path}': {reason}")]
    InvalidFieldPath {
        /// The path as given by the user
        path: String,
        /// Why the path was rejected
        reason: &'static str,
    },

    /// An input line was not valid JSON
    #[error("Malformed record on line {line}: {source}")]
    MalformedRecord {
        /// 1-based input line number
        line: u64,
        /// The underlying parse failure
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StatsError {
    /// Whether this error stems from user configuration rather than input or IO
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            StatsError::Configuration(_) | StatsError::InvalidFieldPath { .. }
        )
    }
}

/// Result type alias for json-stats operations
pub type Result<T> = std::result::Result<T, StatsError>;
