//! REST client for the archive storage service.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use serde::Deserialize;

use super::http::{build_http_client, ensure_status, parse_json};
use super::protocols::StorageClient;
use crate::config::ClientConfig;
use crate::errors::PackageError;

/// Multipart field carrying the uploaded file.
const UPLOAD_FIELD: &str = "uploadfile";

/// Header announcing the upload size.
const FILE_SIZE_HEADER: &str = "X-File-Size";

/// Response returned by the storage service after an upload.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: String,
}

/// HTTP client for a storage service.
#[derive(Debug, Clone)]
pub struct StorageServiceClient {
    client: reqwest::Client,
    archive_endpoint: Url,
}

impl StorageServiceClient {
    /// Creates a client for the storage service at `url`.
    pub fn new(config: &ClientConfig, url: &str) -> Result<Self, PackageError> {
        Self::with_client(build_http_client(config)?, url)
    }

    /// Creates a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, url: impl AsRef<str>) -> Result<Self, PackageError> {
        let raw = format!("{}/v1/archive", url.as_ref().trim_end_matches('/'));
        let archive_endpoint = Url::parse(&raw).map_err(|e| PackageError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client,
            archive_endpoint,
        })
    }
}

#[async_trait]
impl StorageClient for StorageServiceClient {
    async fn upload(&self, file_name: &str, content: Vec<u8>) -> Result<String, PackageError> {
        let action = format!("upload file {file_name}");
        let size = content.len();
        let form = Form::new().part(
            UPLOAD_FIELD,
            Part::bytes(content).file_name(file_name.to_string()),
        );

        let response = self
            .client
            .post(self.archive_endpoint.clone())
            .header(FILE_SIZE_HEADER, size.to_string())
            .multipart(form)
            .send()
            .await
            .map_err(|e| PackageError::request(action.as_str(), e))?;

        let response = ensure_status(&action, response, None).await?;
        let body: UploadResponse = parse_json(&action, response).await?;
        tracing::debug!(file = file_name, size, id = %body.id, "Uploaded archive");
        Ok(body.id)
    }

    fn archive_url(&self, id: &str) -> String {
        let mut url = self.archive_endpoint.clone();
        url.query_pairs_mut().append_pair("id", id);
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubResponse, StubServer};

    fn client_for(server: &StubServer) -> StorageServiceClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        StorageServiceClient::with_client(http, format!("{}/proxy/storage", server.url())).unwrap()
    }

    #[test]
    fn test_archive_url_encodes_id() {
        let client = StorageServiceClient::new(
            &ClientConfig::default(),
            "http://controller:8888/proxy/storage/",
        )
        .unwrap();

        assert_eq!(
            client.archive_url("3f2a"),
            "http://controller:8888/proxy/storage/v1/archive?id=3f2a"
        );
        assert_eq!(
            client.archive_url("a b&c"),
            "http://controller:8888/proxy/storage/v1/archive?id=a+b%26c"
        );
    }

    #[test]
    fn test_rejects_invalid_base() {
        let err = StorageServiceClient::new(&ClientConfig::default(), "not a url").unwrap_err();
        assert!(matches!(err, PackageError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_upload_sends_multipart() {
        let server = StubServer::start(vec![StubResponse::json(200, r#"{"id": "blob-7"}"#)]).await;
        let client = client_for(&server);

        let id = client.upload("big.zip", b"zip-bytes".to_vec()).await.unwrap();
        assert_eq!(id, "blob-7");

        let requests = server.requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/proxy/storage/v1/archive");
        assert_eq!(requests[0].header("x-file-size"), Some("9"));
        assert!(requests[0]
            .header("content-type")
            .is_some_and(|ct| ct.starts_with("multipart/form-data")));

        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains(r#"name="uploadfile"; filename="big.zip""#));
        assert!(body.contains("zip-bytes"));
    }

    #[tokio::test]
    async fn test_upload_failure() {
        let server = StubServer::start(vec![StubResponse::text(507, "disk full")]).await;
        let client = client_for(&server);

        let err = client.upload("big.zip", vec![0; 4]).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to upload file big.zip: HTTP 507: disk full");
    }
}
