//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while decoding a textual duration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DurationError {
    #[error("Unrecognized duration unit in {0:?}")]
    UnrecognizedUnit(String),

    #[error("Invalid duration value in {0:?}")]
    InvalidDurationValue(String),
}

/// Errors that can occur while reducing span events into a call tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReduceError {
    #[error(transparent)]
    Duration(#[from] DurationError),

    #[error("Span stack mismatch on {span:?}: declared ancestors {declared:?}, open spans {open:?}")]
    StackMismatch {
        span: String,
        declared: Vec<String>,
        open: Vec<String>,
    },

    #[error("Event stream ended with unclosed spans: {0:?}")]
    UnclosedSpans(Vec<String>),

    #[error("Repeat count must be greater than zero")]
    ZeroRepeats,
}

/// Errors that can occur while reading trace logs
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to read trace: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur during flamegraph generation
#[derive(Error, Debug)]
pub enum FlamegraphError {
    #[error("Failed to generate flamegraph: {0}")]
    GenerationFailed(String),

    #[error("Empty stack data")]
    EmptyStacks,
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
