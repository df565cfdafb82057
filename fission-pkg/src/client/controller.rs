//! REST client for the control-plane package endpoints.

use async_trait::async_trait;
use reqwest::StatusCode;

use super::http::{build_http_client, ensure_status, parse_json};
use super::protocols::PackageApi;
use super::storage::StorageServiceClient;
use crate::config::{storage_url, ClientConfig};
use crate::core::{ObjectMeta, Package};
use crate::errors::PackageError;

/// HTTP client for a single control plane.
#[derive(Debug, Clone)]
pub struct ControllerClient {
    client: reqwest::Client,
    url: String,
}

impl ControllerClient {
    /// Creates a client from configuration, normalizing the server URL.
    ///
    /// Fails without touching the network when no URL is configured.
    pub fn new(config: &ClientConfig) -> Result<Self, PackageError> {
        let url = config.server_url()?;
        let client = build_http_client(config)?;
        Ok(Self { client, url })
    }

    /// Creates a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// The control-plane base URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns a storage client for the service proxied by this control plane.
    pub fn storage_client(&self) -> Result<StorageServiceClient, PackageError> {
        StorageServiceClient::with_client(self.client.clone(), storage_url(&self.url))
    }

    fn endpoint(&self, tail: &str) -> String {
        format!("{}/v1/{}", self.url.trim_end_matches('/'), tail)
    }

    fn package_endpoint(&self, metadata: &ObjectMeta) -> String {
        self.endpoint(&format!("packages/{}", metadata.name))
    }
}

#[async_trait]
impl PackageApi for ControllerClient {
    async fn package_create(&self, package: &Package) -> Result<ObjectMeta, PackageError> {
        const ACTION: &str = "create package";
        let response = self
            .client
            .post(self.endpoint("packages"))
            .json(package)
            .send()
            .await
            .map_err(|e| PackageError::request(ACTION, e))?;

        let response = ensure_status(ACTION, response, Some(StatusCode::CREATED)).await?;
        parse_json(ACTION, response).await
    }

    async fn package_get(&self, metadata: &ObjectMeta) -> Result<Package, PackageError> {
        const ACTION: &str = "get package";
        let response = self
            .client
            .get(self.package_endpoint(metadata))
            .query(&[("namespace", metadata.namespace.as_str())])
            .send()
            .await
            .map_err(|e| PackageError::request(ACTION, e))?;

        let response = ensure_status(ACTION, response, None).await?;
        parse_json(ACTION, response).await
    }

    async fn package_list(&self) -> Result<Vec<Package>, PackageError> {
        const ACTION: &str = "list packages";
        let response = self
            .client
            .get(self.endpoint("packages"))
            .send()
            .await
            .map_err(|e| PackageError::request(ACTION, e))?;

        let response = ensure_status(ACTION, response, None).await?;
        parse_json(ACTION, response).await
    }

    async fn package_delete(&self, metadata: &ObjectMeta) -> Result<(), PackageError> {
        const ACTION: &str = "delete package";
        let response = self
            .client
            .delete(self.package_endpoint(metadata))
            .query(&[("namespace", metadata.namespace.as_str())])
            .send()
            .await
            .map_err(|e| PackageError::request(ACTION, e))?;

        ensure_status(ACTION, response, None).await?;
        Ok(())
    }
}
