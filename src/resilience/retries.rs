//! Retry policy.
//!
//! # Responsibilities
//! - Hold the attempt bound and backoff parameters for an executor
//! - Decide whether a classified failure earns another attempt
//!
//! # Design Decisions
//! - Double gate: the classification must flag the error retryable AND the
//!   policy must list its code
//! - Fixed for the lifetime of the executor that owns it

use std::collections::HashSet;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::resilience::backoff::calculate_backoff;
use crate::resilience::classify::{ClassifiedError, ErrorCode};

/// Codes retried by default.
pub const DEFAULT_RETRYABLE: [ErrorCode; 4] = [
    ErrorCode::NetworkError,
    ErrorCode::Timeout,
    ErrorCode::ServerError,
    ErrorCode::RateLimited,
];

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    pub retryable_errors: HashSet<ErrorCode>,
    pub jitter_ratio: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            backoff_multiplier: 2.0,
            retryable_errors: DEFAULT_RETRYABLE.into_iter().collect(),
            jitter_ratio: 0.0,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            backoff_multiplier: config.backoff_multiplier,
            retryable_errors: config.retryable_errors.iter().copied().collect(),
            jitter_ratio: config.jitter_ratio,
        }
    }
}

impl RetryPolicy {
    /// True when both the classification and this policy allow a retry.
    pub fn is_retryable(&self, error: &ClassifiedError) -> bool {
        error.retryable && self.retryable_errors.contains(&error.code)
    }

    /// True when `attempt` failed with `error` and another attempt should follow.
    pub fn should_retry(&self, error: &ClassifiedError, attempt: u32) -> bool {
        self.is_retryable(error) && attempt < self.max_attempts
    }

    /// Delay to wait after `attempt` has failed.
    pub fn delay(&self, attempt: u32) -> Duration {
        calculate_backoff(
            attempt,
            self.base_delay.as_millis() as u64,
            self.max_delay.as_millis() as u64,
            self.backoff_multiplier,
            self.jitter_ratio,
        )
    }
}
