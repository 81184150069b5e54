//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! resilience layer. All types derive Serde traits for deserialization
//! from config files.

use serde::{Deserialize, Serialize};

use crate::resilience::classify::ErrorCode;
use crate::resilience::retries::DEFAULT_RETRYABLE;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Execution mode; only `production` escalates to monitoring.
    pub mode: ExecutionMode,

    /// API endpoint settings.
    pub api: ApiConfig,

    /// Retry configuration.
    pub retries: RetryConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Health probe settings.
    pub health_check: HealthCheckConfig,

    /// External monitoring settings.
    pub monitoring: MonitoringConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Development,
    Production,
    Test,
}

/// API endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every relative call, probe and monitoring path is joined onto.
    pub base_url: String,

    /// Client identifier stamped into error contexts. Generated when absent.
    pub client_id: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            client_id: None,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts of the primary call (including the first).
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Multiplicative backoff factor.
    pub backoff_multiplier: f64,

    /// Codes eligible for retry.
    pub retryable_errors: Vec<ErrorCode>,

    /// Fraction of each delay added as random jitter (0.0 disables).
    pub jitter_ratio: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 10_000,
            backoff_multiplier: 2.0,
            retryable_errors: DEFAULT_RETRYABLE.to_vec(),
            jitter_ratio: 0.0,
        }
    }
}

/// Timeout configuration in milliseconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Ceiling for each primary attempt.
    pub primary_ms: u64,

    /// Ceiling for the single fallback attempt.
    pub fallback_ms: u64,

    /// Ceiling for each health probe.
    pub probe_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            primary_ms: 15_000,
            fallback_ms: 10_000,
            probe_ms: 5_000,
        }
    }
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Enable capability probes in health reports.
    pub enabled: bool,

    /// Named capabilities to probe.
    pub services: Vec<String>,

    /// Probe path prefix; the service name is appended.
    pub path_prefix: String,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            services: vec![
                "weather".to_string(),
                "locations".to_string(),
                "safety".to_string(),
            ],
            path_prefix: "/api/health/".to_string(),
        }
    }
}

/// External monitoring configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Enable dispatch of critical entries (production mode only).
    pub enabled: bool,

    /// Collector path, joined onto the API base URL.
    pub path: String,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: crate::observability::monitoring::MONITORING_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
