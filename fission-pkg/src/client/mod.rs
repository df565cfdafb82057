//! Clients for the control plane and its storage service.
//!
//! This module provides:
//! - Protocol traits for the package API and blob storage
//! - reqwest-backed implementations of both
//! - Client resolution from configuration

mod controller;
mod http;
mod protocols;
mod storage;

pub use controller::ControllerClient;
pub use protocols::{PackageApi, StorageClient};
pub use storage::StorageServiceClient;

#[cfg(test)]
pub use protocols::{MockPackageApi, MockStorageClient};

use crate::config::ClientConfig;
use crate::errors::PackageError;

/// Resolves the control-plane client for `config`.
///
/// Fails with [`PackageError::MissingServerUrl`] before any network call
/// when no server URL is configured, and with
/// [`PackageError::InvalidTimeout`] for an unusable timeout.
pub fn resolve_client(config: &ClientConfig) -> Result<ControllerClient, PackageError> {
    let client = ControllerClient::new(config)?;
    tracing::debug!(server = client.url(), "Resolved control-plane client");
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_client_scheme() {
        let client = resolve_client(&ClientConfig::new("127.0.0.1:31313")).unwrap();
        assert_eq!(client.url(), "http://127.0.0.1:31313");

        let client = resolve_client(&ClientConfig::new("https://secure:443")).unwrap();
        assert_eq!(client.url(), "https://secure:443");
    }

    #[test]
    fn test_resolve_client_missing_url() {
        let err = resolve_client(&ClientConfig::new("")).unwrap_err();
        assert!(err.is_local());
    }

    #[test]
    fn test_resolve_client_rejects_bad_timeout() {
        let config = ClientConfig::new("127.0.0.1:31313").with_timeout(-1.0);
        let err = resolve_client(&config).unwrap_err();
        assert!(matches!(err, PackageError::InvalidTimeout { .. }));
        assert!(err.is_local());
    }
}
