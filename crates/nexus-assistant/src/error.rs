//! Error types for the assistant crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while answering questions.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// A required setting is absent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Model invocation failed at the transport level.
    #[error("model invocation failed: {0}")]
    ModelInvocation(String),

    /// The model API answered with an error status.
    #[error("Gemini API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The model response could not be decoded.
    #[error("failed to parse response: {0}")]
    ResponseParse(String),

    /// A data file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Text could not be extracted from a PDF.
    #[error("failed to extract text from {path}: {message}")]
    Extract { path: PathBuf, message: String },

    /// A data file has the wrong shape.
    #[error("invalid data in {path}: {source}")]
    InvalidData {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for assistant operations.
pub type Result<T> = std::result::Result<T, AssistantError>;
