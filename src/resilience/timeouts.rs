//! Timeout enforcement.
//!
//! # Responsibilities
//! - Race each wrapped operation against a deadline
//! - Turn an elapsed deadline into a `RawFailure::Timeout`
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; the operation future is dropped when
//!   the deadline wins, so it is cancelled at its next suspension point
//! - Primary calls get a longer ceiling than fallbacks

use std::future::Future;
use std::time::Duration;

use crate::config::TimeoutConfig;
use crate::resilience::classify::RawFailure;

/// Deadlines for the three kinds of outbound work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    pub primary: Duration,
    pub fallback: Duration,
    pub probe: Duration,
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            primary: Duration::from_secs(15),
            fallback: Duration::from_secs(10),
            probe: Duration::from_secs(5),
        }
    }
}

impl From<&TimeoutConfig> for TimeoutPolicy {
    fn from(config: &TimeoutConfig) -> Self {
        Self {
            primary: Duration::from_millis(config.primary_ms),
            fallback: Duration::from_millis(config.fallback_ms),
            probe: Duration::from_millis(config.probe_ms),
        }
    }
}

/// Run `operation` under `limit`.
pub async fn with_timeout<T, F>(limit: Duration, operation: F) -> Result<T, RawFailure>
where
    F: Future<Output = Result<T, RawFailure>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(RawFailure::Timeout {
            after_ms: limit.as_millis() as u64,
        }),
    }
}
