//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (attempts >= 1, timeouts > 0, delays ordered)
//! - Check URLs and addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ResilienceConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::ResilienceConfig;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("retries.max_attempts must be at least 1")]
    NoAttempts,

    #[error("retries.base_delay_ms ({base}) exceeds retries.max_delay_ms ({max})")]
    DelayOrder { base: u64, max: u64 },

    #[error("retries.backoff_multiplier must be >= 1.0, got {0}")]
    Multiplier(f64),

    #[error("retries.jitter_ratio must be within [0, 1], got {0}")]
    Jitter(f64),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("invalid api.base_url '{0}'")]
    BaseUrl(String),

    #[error("health_check.services contains an empty name")]
    EmptyService,

    #[error("health_check.services lists '{0}' more than once")]
    DuplicateService(String),

    #[error("invalid observability.metrics_address '{0}'")]
    MetricsAddress(String),
}

pub fn validate_config(config: &ResilienceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let retries = &config.retries;
    if retries.max_attempts == 0 {
        errors.push(ValidationError::NoAttempts);
    }
    if retries.base_delay_ms > retries.max_delay_ms {
        errors.push(ValidationError::DelayOrder {
            base: retries.base_delay_ms,
            max: retries.max_delay_ms,
        });
    }
    let multiplier = retries.backoff_multiplier;
    if !multiplier.is_finite() || multiplier < 1.0 {
        errors.push(ValidationError::Multiplier(retries.backoff_multiplier));
    }
    if !(0.0..=1.0).contains(&retries.jitter_ratio) {
        errors.push(ValidationError::Jitter(retries.jitter_ratio));
    }

    let timeouts = &config.timeouts;
    for (name, value) in [
        ("primary_ms", timeouts.primary_ms),
        ("fallback_ms", timeouts.fallback_ms),
        ("probe_ms", timeouts.probe_ms),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if Url::parse(&config.api.base_url).is_err() {
        errors.push(ValidationError::BaseUrl(config.api.base_url.clone()));
    }

    let mut seen = HashSet::new();
    for service in &config.health_check.services {
        if service.trim().is_empty() {
            errors.push(ValidationError::EmptyService);
        } else if !seen.insert(service.as_str()) {
            errors.push(ValidationError::DuplicateService(service.clone()));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
