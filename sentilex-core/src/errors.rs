//! errors.rs - Custom error types for the sentilex-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

use crate::method::Method;

/// This enum represents all possible error types in the `sentilex-core` library.
///
/// Marked `#[non_exhaustive]` so variants can be added without breaking
/// downstream matches.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SentilexError {
    /// Malformed call-site input, raised before any parsing work happens.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A structurally invalid validation row. Aborts the evaluation run.
    #[error("Malformed input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    /// An article record lacks a field the runner needs. Soft: the article is skipped.
    #[error("Record '{record}' is missing required field '{field}'")]
    MissingField { record: String, field: &'static str },

    #[error("Lexicon error: {0}")]
    Lexicon(String),

    #[error("Dependency parser failed: {0}")]
    Parser(String),

    #[error("Polarity classifier failed: {0}")]
    Classifier(String),

    #[error("Scoring method '{0}' is not configured")]
    MethodUnavailable(Method),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),
}

impl SentilexError {
    /// Per-item failures that a batch should log and skip rather than abort on.
    pub fn is_item_local(&self) -> bool {
        matches!(
            self,
            SentilexError::MissingField { .. }
                | SentilexError::Parser(_)
                | SentilexError::Classifier(_)
                | SentilexError::MethodUnavailable(_)
        )
    }
}
