//! Error types for the JSONPath command-line front end.
//!
//! Library operations report [`EvaluationError`]; the CLI wraps those together
//! with I/O and JSON failures in [`JsonPathError`].

use std::fmt;

use atrius_jsonpath_support::EvaluationError;

/// Result type alias for front-end operations
pub type JsonPathResult<T> = Result<T, JsonPathError>;

#[derive(Debug)]
pub enum JsonPathError {
    /// The path text did not compile
    ParseError(String),

    /// Evaluating a compiled path failed
    EvaluationError(EvaluationError),

    /// IO error (file operations, etc.)
    IoError(std::io::Error),

    /// JSON serialization/deserialization error
    JsonError(serde_json::Error),
}

impl fmt::Display for JsonPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonPathError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            JsonPathError::EvaluationError(err) => write!(f, "Evaluation error: {}", err),
            JsonPathError::IoError(err) => write!(f, "IO error: {}", err),
            JsonPathError::JsonError(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for JsonPathError {}

impl From<std::io::Error> for JsonPathError {
    fn from(err: std::io::Error) -> Self {
        JsonPathError::IoError(err)
    }
}

impl From<serde_json::Error> for JsonPathError {
    fn from(err: serde_json::Error) -> Self {
        JsonPathError::JsonError(err)
    }
}

impl From<EvaluationError> for JsonPathError {
    fn from(err: EvaluationError) -> Self {
        match err {
            EvaluationError::InvalidPath(msg) => JsonPathError::ParseError(msg),
            other => JsonPathError::EvaluationError(other),
        }
    }
}
