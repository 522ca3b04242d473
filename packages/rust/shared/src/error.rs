//! Error types for fomc-corpus.
//!
//! Library crates use [`FomcError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all fomc-corpus operations.
///
/// Every variant is fatal: a pipeline invocation that hits one of these
/// returns it to the caller and no dataset is produced.
#[derive(Debug, thiserror::Error)]
pub enum FomcError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while loading a listing page or document.
    #[error("network error: {0}")]
    Network(String),

    /// Expected markup or structure is absent.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A string did not match the expected date pattern.
    #[error("date format error: {input:?} does not match {expected}")]
    DateFormat { input: String, expected: String },

    /// PDF text extraction failed.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A fetch task panicked or was cancelled.
    #[error("task error: {0}")]
    Task(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FomcError>;

impl FomcError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a date format error for `input` that failed to parse as `expected`.
    pub fn date_format(input: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::DateFormat {
            input: input.into(),
            expected: expected.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = FomcError::config("max_threads must be at least 1");
        assert_eq!(err.to_string(), "config error: max_threads must be at least 1");

        let err = FomcError::date_format("April 31 2005", "%B %d, %Y");
        assert!(err.to_string().contains("April 31 2005"));
        assert!(err.to_string().contains("%B %d, %Y"));
    }
}
