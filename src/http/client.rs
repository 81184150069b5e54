//! HTTP calls that speak the executor's failure vocabulary.
//!
//! # Responsibilities
//! - Resolve relative API paths against the configured base URL
//! - Translate reqwest outcomes into `RawFailure`
//!
//! # Design Decisions
//! - No retries here; the executor owns retry and timeout policy
//! - Non-2xx responses are failures carrying their status
//! - The body is read before it is decoded, so a dropped connection is a
//!   transport failure and a malformed body is not

use std::time::Duration;
use serde::de::DeserializeOwned;
use url::Url;

use crate::resilience::classify::RawFailure;

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    request_timeout: Duration,
}

impl ApiClient {
    /// `request_timeout` bounds each request and is reported on timeouts.
    pub fn new(client: reqwest::Client, base_url: Url, request_timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            request_timeout,
        }
    }

    pub fn url(&self, path: &str) -> Result<Url, RawFailure> {
        self.base_url
            .join(path)
            .map_err(|e| RawFailure::other(format!("invalid path '{}': {}", path, e)))
    }

    /// GET `path` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RawFailure> {
        let url = self.url(path)?;
        let response = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            };
            return Err(RawFailure::http(status.as_u16(), message));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| map_body_error(e, self.request_timeout))?;
        serde_json::from_slice(&body)
            .map_err(|e| RawFailure::other(format!("invalid response body: {}", e)))
    }

    fn map_error(&self, error: reqwest::Error) -> RawFailure {
        map_reqwest_error(error, self.request_timeout)
    }
}

/// Map a reqwest error onto the failure shapes. `timeout` is the limit the
/// request ran under.
pub fn map_reqwest_error(error: reqwest::Error, timeout: Duration) -> RawFailure {
    if error.is_timeout() {
        RawFailure::Timeout {
            after_ms: timeout.as_millis() as u64,
        }
    } else if let Some(status) = error.status() {
        RawFailure::http(status.as_u16(), error.to_string())
    } else if error.is_connect() || error.is_request() {
        RawFailure::network(error.to_string())
    } else {
        RawFailure::other(error.to_string())
    }
}

/// Body reads precede JSON decoding, so any error here other than a timeout
/// is a transport failure.
fn map_body_error(error: reqwest::Error, timeout: Duration) -> RawFailure {
    if error.is_timeout() {
        RawFailure::Timeout {
            after_ms: timeout.as_millis() as u64,
        }
    } else {
        RawFailure::network(error.to_string())
    }
}
