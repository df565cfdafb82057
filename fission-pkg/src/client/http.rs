//! Shared reqwest plumbing for the service clients.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::errors::PackageError;

/// Builds a reqwest client honouring the configured timeout and user agent.
pub(crate) fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client, PackageError> {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
    if let Some(timeout) = config.timeout()? {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| PackageError::request("create HTTP client", e))
}

/// Returns the response unchanged when its status is `expected` (or any 2xx
/// when `expected` is `None`); otherwise turns the body into an error.
pub(crate) async fn ensure_status(
    action: &str,
    response: Response,
    expected: Option<StatusCode>,
) -> Result<Response, PackageError> {
    let status = response.status();
    let accepted = match expected {
        Some(code) => status == code,
        None => status.is_success(),
    };
    if accepted {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    Err(PackageError::api(action, status.as_u16(), body))
}

/// Decodes a JSON body.
pub(crate) async fn parse_json<T: DeserializeOwned>(
    action: &str,
    response: Response,
) -> Result<T, PackageError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| PackageError::request(action, e))?;
    Ok(serde_json::from_slice(&bytes)?)
}
