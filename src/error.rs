//! Error types for the smartcab crate

use thiserror::Error;

/// Main error type for the smartcab crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid action '{input}' (expected one of: none, forward, left, right)")]
    InvalidAction { input: String },

    #[error("invalid light '{input}' (expected 'red' or 'green')")]
    InvalidLight { input: String },

    #[error("invalid percept value '{value}' for '{key}': {reason}")]
    InvalidPercept {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown percept key '{key}' (expected one of: {expected})")]
    UnknownPerceptKey { key: String, expected: String },

    #[error("missing percept '{key}' in '{context}'")]
    MissingPercept { key: String, context: String },

    #[error("invalid state encoding '{input}' (expected 'compact' or 'full')")]
    ParseStateEncoding { input: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

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
