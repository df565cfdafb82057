//! Client configuration and server URL resolution.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::{ARCHIVE_LITERAL_SIZE_LIMIT, DEFAULT_NAMESPACE};
use crate::errors::PackageError;

/// Environment variable consulted when no server URL is passed explicitly.
pub const SERVER_URL_ENV: &str = "FISSION_URL";

/// Configuration for talking to a control plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Control-plane base URL as given by the user.
    #[serde(default)]
    pub server_url: String,
    /// Namespace for packages and environment references.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Files smaller than this are embedded instead of uploaded.
    #[serde(default = "default_literal_size_limit")]
    pub literal_size_limit: u64,
    /// Request timeout in seconds. `None` waits indefinitely.
    #[serde(default)]
    pub timeout_seconds: Option<f64>,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_literal_size_limit() -> u64 {
    ARCHIVE_LITERAL_SIZE_LIMIT
}

fn default_user_agent() -> String {
    format!("fission-pkg/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            namespace: default_namespace(),
            literal_size_limit: default_literal_size_limit(),
            timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration targeting `server_url`.
    #[must_use]
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::default()
        }
    }

    /// Creates a configuration from the `FISSION_URL` environment variable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(std::env::var(SERVER_URL_ENV).unwrap_or_default())
    }

    /// Uses `flag` when non-empty, otherwise falls back to `FISSION_URL`.
    #[must_use]
    pub fn resolve(flag: Option<&str>) -> Self {
        match flag.map(str::trim).filter(|s| !s.is_empty()) {
            Some(url) => Self::new(url),
            None => Self::from_env(),
        }
    }

    /// Sets the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the literal size limit.
    #[must_use]
    pub fn with_literal_size_limit(mut self, limit: u64) -> Self {
        self.literal_size_limit = limit;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Gets the timeout as a Duration.
    ///
    /// Negative, zero, non-finite and out-of-range values are rejected.
    pub fn timeout(&self) -> Result<Option<Duration>, PackageError> {
        self.timeout_seconds
            .map(|seconds| match Duration::try_from_secs_f64(seconds) {
                Ok(duration) if !duration.is_zero() => Ok(duration),
                _ => Err(PackageError::InvalidTimeout { seconds }),
            })
            .transpose()
    }

    /// Returns the normalized server URL.
    pub fn server_url(&self) -> Result<String, PackageError> {
        normalize_server_url(&self.server_url)
    }
}

/// Normalizes a control-plane URL.
///
/// Empty input is rejected. A URL without an `http://` or `https://` prefix
/// gets `http://` prepended; anything else is returned unchanged.
pub fn normalize_server_url(raw: &str) -> Result<String, PackageError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PackageError::MissingServerUrl);
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("http://{trimmed}"))
    }
}

/// Returns the storage-service endpoint proxied by the control plane.
#[must_use]
pub fn storage_url(controller_url: &str) -> String {
    format!("{}/proxy/storage", controller_url.trim_end_matches('/'))
}
