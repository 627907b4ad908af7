//! Error types for gitops-actions operations.
//!
//! Every stage returns the first error immediately to its caller; nothing in
//! this crate retries or wraps errors on the way up.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gitops-actions operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for all gitops-actions operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required argument was missing or unusable
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Reason for the error
        reason: String,
    },

    /// A shelled-out command exited non-zero (or could not be started)
    #[error("command `{command}` failed: {reason}")]
    Execution {
        /// Command line that failed
        command: String,
        /// Captured stderr or spawn failure
        reason: String,
    },

    /// The local pipeline configuration file could not be parsed
    #[error("malformed config {path}: {reason}")]
    Config {
        /// Path to the config file
        path: PathBuf,
        /// Parse failure detail
        reason: String,
    },

    /// The hosting API rejected a request
    #[error("hosting API returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// A structured query against a values file failed
    #[error("values query failed: {reason}")]
    Values {
        /// What the query was looking for
        reason: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Shorthand for an `InvalidArgument` error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            reason: reason.into(),
        }
    }
}
