//! Active capability probing.
//!
//! # Responsibilities
//! - Probe each named capability's health path
//! - Map the outcome to healthy / degraded / down

use std::collections::BTreeMap;
use std::time::Duration;
use futures_util::future::join_all;
use tokio::time;
use url::Url;

use crate::config::HealthCheckConfig;
use crate::health::state::ServiceStatus;
use crate::observability::metrics;

pub struct HealthChecker {
    client: reqwest::Client,
    base_url: Url,
    config: HealthCheckConfig,
    timeout: Duration,
}

impl HealthChecker {
    pub fn new(client: reqwest::Client, base_url: Url, config: HealthCheckConfig, timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            config,
            timeout,
        }
    }

    pub fn probe_url(&self, service: &str) -> Result<Url, url::ParseError> {
        self.base_url
            .join(&format!("{}{}", self.config.path_prefix, service))
    }

    /// Probe one capability. Never fails; failures map to `Down`.
    pub async fn probe(&self, service: &str) -> ServiceStatus {
        let url = match self.probe_url(service) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(service, error = %e, "Failed to build health probe URL");
                return ServiceStatus::Down;
            }
        };

        let request = self
            .client
            .head(url)
            .header("user-agent", "weather-resilience-health-check")
            .send();

        let status = match time::timeout(self.timeout, request).await {
            Ok(Ok(response)) => {
                if response.status().is_success() {
                    ServiceStatus::Healthy
                } else {
                    tracing::warn!(service, status = %response.status(), "Health probe failed: non-success status");
                    ServiceStatus::Degraded
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(service, error = %e, "Health probe failed: connection error");
                ServiceStatus::Down
            }
            Err(_) => {
                tracing::warn!(service, "Health probe failed: timeout");
                ServiceStatus::Down
            }
        };

        metrics::record_service_health(service, status);
        status
    }

    /// Probe every configured capability concurrently.
    pub async fn check_all(&self) -> BTreeMap<String, ServiceStatus> {
        if !self.config.enabled {
            return BTreeMap::new();
        }

        let probes = self.config.services.iter().map(|service| async move {
            (service.clone(), self.probe(service).await)
        });
        join_all(probes).await.into_iter().collect()
    }
}
