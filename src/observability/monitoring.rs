//! External monitoring egress.
//!
//! # Responsibilities
//! - Ship critical failure entries to an external collector
//! - Never let a dispatch failure reach the caller
//!
//! # Design Decisions
//! - Sinks return boxed futures so executors can hold `Arc<dyn MonitoringSink>`
//! - Dispatch is fire-and-forget on a spawned task

use std::sync::Arc;
use futures_util::future::BoxFuture;
use thiserror::Error;
use url::Url;

use crate::observability::metrics;
use crate::resilience::log::ErrorLogEntry;

/// Fixed collector path, relative to the API base URL.
pub const MONITORING_PATH: &str = "/api/monitoring/error";

#[derive(Debug, Error)]
pub enum MonitoringError {
    #[error("monitoring request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("monitoring endpoint returned status {0}")]
    Status(u16),
}

/// Destination for escalated failure entries.
pub trait MonitoringSink: Send + Sync {
    fn report(&self, entry: ErrorLogEntry) -> BoxFuture<'static, Result<(), MonitoringError>>;
}

/// Posts entries as JSON to the collector endpoint.
#[derive(Debug, Clone)]
pub struct HttpMonitoringSink {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpMonitoringSink {
    pub fn new(client: reqwest::Client, base_url: &Url, path: &str) -> Result<Self, url::ParseError> {
        let endpoint = base_url.join(path)?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl MonitoringSink for HttpMonitoringSink {
    fn report(&self, entry: ErrorLogEntry) -> BoxFuture<'static, Result<(), MonitoringError>> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        Box::pin(async move {
            let response = client.post(endpoint).json(&entry).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(MonitoringError::Status(status.as_u16()));
            }
            Ok(())
        })
    }
}

/// Send `entry` to `sink` in the background. Outcomes are only logged.
pub fn dispatch(sink: Arc<dyn MonitoringSink>, entry: ErrorLogEntry) {
    let handle = match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle,
        Err(_) => {
            tracing::warn!(code = %entry.error.code, "No async runtime, skipping monitoring dispatch");
            return;
        }
    };

    handle.spawn(async move {
        let code = entry.error.code;
        match sink.report(entry).await {
            Ok(()) => {
                metrics::record_monitoring_dispatch(true);
                tracing::debug!(code = %code, "Critical error reported to monitoring");
            }
            Err(e) => {
                metrics::record_monitoring_dispatch(false);
                tracing::error!(code = %code, error = %e, "Failed to report error to monitoring");
            }
        }
    });
}
