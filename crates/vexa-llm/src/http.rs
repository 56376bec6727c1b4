//! Shared reqwest plumbing for the hosted provider clients.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use vexa_core::error::VexaError;

/// Build an HTTP client with a per-request timeout.
pub fn build_client(timeout: Duration) -> Result<Client, VexaError> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| VexaError::Http(format!("failed to build HTTP client: {}", e)))
}

/// Attach a bearer token when one is configured.
pub fn authorize(builder: RequestBuilder, api_key: Option<&str>) -> RequestBuilder {
    match api_key {
        Some(key) => builder.bearer_auth(key),
        None => builder,
    }
}

/// Convert a transport-level reqwest error.
pub fn http_error(err: reqwest::Error) -> VexaError {
    if err.is_timeout() {
        VexaError::Http(format!("request timed out: {}", err))
    } else {
        VexaError::Http(err.to_string())
    }
}

/// Fail non-success responses, keeping the provider's error text.
pub async fn ensure_success(response: Response) -> Result<Response, VexaError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(VexaError::Http(format!("provider returned {}: {}", status, body)))
}

/// Join a base URL and an endpoint path without doubling slashes.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
