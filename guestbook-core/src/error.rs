//! Structured error types for guestbook-core library.
//!
//! Binary crates (guestbook-cli) use `anyhow`; library consumers get
//! structured errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for guestbook-core operations
#[derive(Error, Debug)]
pub enum GuestbookError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Config file exists but could not be parsed
    #[error("Invalid config file {path:?}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    /// Endpoint is not a usable http(s) base URL
    #[error("Invalid endpoint '{value}': {reason}")]
    InvalidEndpoint { value: String, reason: String },

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {reason}")]
    Client { reason: String },
}

/// Result type alias for guestbook-core operations
pub type Result<T> = std::result::Result<T, GuestbookError>;

impl GuestbookError {
    /// Create an invalid config error
    pub fn invalid_config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid endpoint error
    pub fn invalid_endpoint(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a client construction error
    pub fn client(reason: impl Into<String>) -> Self {
        Self::Client {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GuestbookError::invalid_endpoint("ftp://box", "scheme must be http or https");
        assert_eq!(
            err.to_string(),
            "Invalid endpoint 'ftp://box': scheme must be http or https"
        );

        let err = GuestbookError::invalid_config("/tmp/config.toml", "expected a table");
        assert!(err.to_string().contains("Invalid config file"));
        assert!(err.to_string().contains("/tmp/config.toml"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: GuestbookError = io_err.into();

        assert!(matches!(err, GuestbookError::Io { .. }));
    }
}
