//! Metrics collection and exposition.
//!
//! # Metrics
//! - `resilience_errors_total` (counter): logged failures by code, severity
//! - `resilience_retries_total` (counter): scheduled retries by code
//! - `resilience_recoveries_total` (counter): calls that succeeded after a retry
//! - `resilience_fallbacks_total` (counter): fallback outcomes
//! - `resilience_monitoring_dispatch_total` (counter): monitoring sink outcomes
//! - `resilience_service_health` (gauge): 1=healthy, 0.5=degraded, 0=down

use std::net::SocketAddr;
use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::health::ServiceStatus;
use crate::resilience::classify::{ErrorCode, Severity};

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_error(code: ErrorCode, severity: Severity) {
    counter!(
        "resilience_errors_total",
        "code" => code.as_str(),
        "severity" => severity.as_str()
    )
    .increment(1);
}

pub fn record_retry(code: ErrorCode) {
    counter!("resilience_retries_total", "code" => code.as_str()).increment(1);
}

pub fn record_recovery() {
    counter!("resilience_recoveries_total").increment(1);
}

pub fn record_fallback(succeeded: bool) {
    let outcome = if succeeded { "success" } else { "failure" };
    counter!("resilience_fallbacks_total", "outcome" => outcome).increment(1);
}

pub fn record_monitoring_dispatch(succeeded: bool) {
    let outcome = if succeeded { "success" } else { "failure" };
    counter!("resilience_monitoring_dispatch_total", "outcome" => outcome).increment(1);
}

pub fn record_service_health(service: &str, status: ServiceStatus) {
    let value = match status {
        ServiceStatus::Healthy => 1.0,
        ServiceStatus::Degraded => 0.5,
        ServiceStatus::Down => 0.0,
    };
    gauge!("resilience_service_health", "service" => service.to_string()).set(value);
}
