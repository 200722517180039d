//! Error types for the sparring crate

use thiserror::Error;

/// Main error type for the sparring crate
///
/// The combat engine itself is total: unmodeled transitions, missing history
/// and unknown keys all resolve to fixed fallbacks. These variants cover the
/// edges around it (configuration, parsing, I/O and input sources).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid agent state '{input}'. Expected one of: {expected}")]
    InvalidAgentState { input: String, expected: String },

    #[error("invalid action '{input}'. Expected one of: {expected}")]
    InvalidAction { input: String, expected: String },

    #[error("invalid key binding '{key}': {reason}")]
    InvalidKeyBinding { key: String, reason: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("scripted input exhausted after {consumed} responses")]
    InputExhausted { consumed: usize },

    #[error("input source closed")]
    InputClosed,

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    /// Wrap an I/O error with a description of what was being attempted.
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            operation: operation.into(),
            source,
        }
    }
}
