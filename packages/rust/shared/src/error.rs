//! Error types for the storefront.
//!
//! Library crates use [`StorefrontError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all storefront operations.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Transport-level failure talking to the commerce backend or the CMS.
    #[error("network error: {0}")]
    Network(String),

    /// A backend answered, but with a non-success status or a GraphQL error.
    #[error("{service} API error (status {status}): {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// Response body did not match the expected shape.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad params, malformed manifest, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, StorefrontError>;

impl StorefrontError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a decode error from any displayable message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
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
        let err = StorefrontError::config("missing CMS token");
        assert_eq!(err.to_string(), "config error: missing CMS token");

        let err = StorefrontError::Api {
            service: "cms",
            status: 401,
            message: "Unauthorized".into(),
        };
        assert_eq!(err.to_string(), "cms API error (status 401): Unauthorized");
    }

    #[test]
    fn io_error_keeps_path() {
        let err = StorefrontError::io(
            "/tmp/out/index.html",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/out/index.html"));
    }
}
