//! Error types for fission-pkg.
//!
//! Every fallible operation in the library returns [`PackageError`]. The
//! variants separate configuration, filesystem, transport and server-side
//! failures so callers can tell them apart, while the rendered message stays a
//! single human-readable line suitable for a fatal CLI diagnostic.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for package operations.
#[derive(Debug, Error)]
pub enum PackageError {
    /// No control-plane URL was supplied by flag or environment.
    #[error("Need --server or FISSION_URL set to your fission server.")]
    MissingServerUrl,

    /// A URL could not be parsed or used as a base.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The request timeout is negative, zero, not finite or out of range.
    #[error("Invalid timeout {seconds}: expected a positive number of seconds")]
    InvalidTimeout {
        /// The rejected value.
        seconds: f64,
    },

    /// A filesystem operation failed.
    #[error("Failed to {action} {}: {source}", .path.display())]
    Io {
        /// What was being attempted (e.g. "stat", "read").
        action: &'static str,
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The HTTP request itself failed (connect, DNS, TLS, body decode).
    #[error("Failed to {action}: {source}")]
    Request {
        /// What was being attempted (e.g. "create package").
        action: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with an unexpected status code.
    #[error("Failed to {action}: HTTP {status}: {body}")]
    Api {
        /// What was being attempted.
        action: String,
        /// HTTP status code.
        status: u16,
        /// Raw response body, trimmed.
        body: String,
    },

    /// An archive payload was malformed or failed verification.
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PackageError {
    /// Creates a filesystem error.
    #[must_use]
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Creates a transport error.
    #[must_use]
    pub fn request(action: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Request {
            action: action.into(),
            source,
        }
    }

    /// Creates an unexpected-status error.
    #[must_use]
    pub fn api(action: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            action: action.into(),
            status,
            body: one_line(&body.into()),
        }
    }

    /// Whether the error was raised before any network traffic took place.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::MissingServerUrl
                | Self::InvalidUrl { .. }
                | Self::InvalidTimeout { .. }
                | Self::Io { .. }
        )
    }
}

fn one_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
