//! Capability health states and the aggregated report.
//!
//! # States
//! - Healthy: probe answered with a success status
//! - Degraded: probe answered, but not with success
//! - Down: probe failed to connect or timed out

use std::collections::BTreeMap;
use std::fmt;
use serde::Serialize;

use crate::resilience::classify::ClassifiedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
    Down,
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceStatus::Healthy => "healthy",
            ServiceStatus::Degraded => "degraded",
            ServiceStatus::Down => "down",
        };
        f.write_str(s)
    }
}

/// Snapshot produced by `ResilientExecutor::check_health`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub online: bool,
    /// Most recent classified failures, oldest first.
    pub recent_errors: Vec<ClassifiedError>,
    pub services: BTreeMap<String, ServiceStatus>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl HealthReport {
    /// True when online and every probed service is healthy.
    pub fn is_healthy(&self) -> bool {
        self.online && self.services.values().all(|s| *s == ServiceStatus::Healthy)
    }
}
