//! Error types for blogbook.
//!
//! Library crates use [`BlogbookError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all blogbook operations.
#[derive(Debug, thiserror::Error)]
pub enum BlogbookError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while fetching a page, an image, or the input list.
    #[error("network error: {0}")]
    Network(String),

    /// None of the prioritized selectors matched the page.
    #[error("no {field} found at {url} (tried: {selectors})")]
    SelectorMiss {
        field: &'static str,
        url: String,
        selectors: String,
    },

    /// Malformed input (e.g. an entry of the URL list that is not a URL).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Precondition violated (empty URL list, missing working directory, ...).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// The external e-book converter could not be run or exited non-zero.
    #[error("conversion error: {0}")]
    Conversion(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BlogbookError>;

impl BlogbookError {
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

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
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
        let err = BlogbookError::config("bad selector");
        assert_eq!(err.to_string(), "config error: bad selector");

        let err = BlogbookError::SelectorMiss {
            field: "body",
            url: "http://blog.example.com/post1".into(),
            selectors: ".entry-content, .post-body".into(),
        };
        assert_eq!(
            err.to_string(),
            "no body found at http://blog.example.com/post1 (tried: .entry-content, .post-body)"
        );
    }

    #[test]
    fn io_error_keeps_path() {
        let err = BlogbookError::io(
            "/tmp/work/1.html",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("1.html"));
    }
}
