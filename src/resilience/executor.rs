//! Resilient call executor.
//!
//! # Call Flow
//! ```text
//! execute(primary, fallback?, context)
//!     for attempt in 1..=max_attempts:
//!         primary() under the primary deadline
//!             Ok  → (attempt > 1: record recovery) → return
//!             Err → classify → log
//!                   retryable && attempts left → sleep(backoff) → next attempt
//!                   otherwise → stop
//!     fallback() once under the fallback deadline
//!         Ok  → record fallback success → return
//!         Err → classify → log (action "fallback")
//!     → ResilientCallError from the last primary failure
//! ```
//!
//! # Design Decisions
//! - One executor is shared by cloning; clones share the policy and the log
//! - The fallback is attempted once and never retried
//! - Only `critical` entries in production mode leave the process

use std::collections::BTreeMap;
use std::future::{Future, Ready};
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

use crate::config::{ExecutionMode, ResilienceConfig};
use crate::health::{HealthChecker, HealthReport};
use crate::net::connectivity::{AlwaysOnline, Connectivity};
use crate::observability::metrics;
use crate::observability::monitoring::{self, HttpMonitoringSink, MonitoringSink};
use crate::resilience::classify::{classify, ClassifiedError, RawFailure, Severity};
use crate::resilience::context::ErrorContext;
use crate::resilience::error::ResilientCallError;
use crate::resilience::log::{
    now_millis, ErrorLog, ErrorLogEntry, ErrorStatistics, EventKind, ResilienceEvent,
    DEFAULT_LOG_CAPACITY,
};
use crate::resilience::retries::RetryPolicy;
use crate::resilience::timeouts::{with_timeout, TimeoutPolicy};

/// Number of recent errors included in a health report.
pub const HEALTH_RECENT_ERRORS: usize = 5;

type NoFallback<T> = fn() -> Ready<Result<T, RawFailure>>;

struct ExecutorInner {
    policy: RetryPolicy,
    timeouts: TimeoutPolicy,
    log: ErrorLog,
    connectivity: Arc<dyn Connectivity>,
    mode: ExecutionMode,
    monitor: Option<Arc<dyn MonitoringSink>>,
    health: Option<HealthChecker>,
    default_context: ErrorContext,
}

/// Wraps fallible async operations with timeouts, retries and a fallback.
#[derive(Clone)]
pub struct ResilientExecutor {
    inner: Arc<ExecutorInner>,
}

impl std::fmt::Debug for ResilientExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientExecutor")
            .field("policy", &self.inner.policy)
            .field("timeouts", &self.inner.timeouts)
            .field("mode", &self.inner.mode)
            .field("logged_errors", &self.inner.log.len())
            .finish()
    }
}

impl Default for ResilientExecutor {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ResilientExecutor {
    pub fn builder() -> ExecutorBuilder {
        ExecutorBuilder::default()
    }

    /// Build an executor, health checker and monitoring sink from configuration.
    pub fn from_config(config: &ResilienceConfig) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(&config.api.base_url)?;
        let client = reqwest::Client::new();
        let timeouts = TimeoutPolicy::from(&config.timeouts);
        let client_id = config
            .api
            .client_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut builder = Self::builder()
            .policy(RetryPolicy::from(&config.retries))
            .timeouts(timeouts)
            .mode(config.mode)
            .default_context(ErrorContext::new().client_id(client_id))
            .health_checker(HealthChecker::new(
                client.clone(),
                base_url.clone(),
                config.health_check.clone(),
                timeouts.probe,
            ));

        if config.monitoring.enabled {
            let sink = HttpMonitoringSink::new(client, &base_url, &config.monitoring.path)?;
            builder = builder.monitoring(Arc::new(sink));
        }

        Ok(builder.build())
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.inner.policy
    }

    pub fn timeouts(&self) -> &TimeoutPolicy {
        &self.inner.timeouts
    }

    pub fn mode(&self) -> ExecutionMode {
        self.inner.mode
    }

    pub fn is_online(&self) -> bool {
        self.inner.connectivity.is_online()
    }

    /// Run `primary` with retries and no fallback.
    pub async fn execute<T, P, PFut>(
        &self,
        primary: P,
        context: ErrorContext,
    ) -> Result<T, ResilientCallError>
    where
        P: FnMut() -> PFut,
        PFut: Future<Output = Result<T, RawFailure>>,
    {
        self.with_error_handling(primary, None::<NoFallback<T>>, context)
            .await
    }

    /// Run `primary` with retries, then `fallback` once if it never succeeded.
    pub async fn execute_with_fallback<T, P, PFut, B, BFut>(
        &self,
        primary: P,
        fallback: B,
        context: ErrorContext,
    ) -> Result<T, ResilientCallError>
    where
        P: FnMut() -> PFut,
        PFut: Future<Output = Result<T, RawFailure>>,
        B: FnOnce() -> BFut,
        BFut: Future<Output = Result<T, RawFailure>>,
    {
        self.with_error_handling(primary, Some(fallback), context)
            .await
    }

    /// Full entry point with an optional fallback.
    pub async fn with_error_handling<T, P, PFut, B, BFut>(
        &self,
        mut primary: P,
        fallback: Option<B>,
        context: ErrorContext,
    ) -> Result<T, ResilientCallError>
    where
        P: FnMut() -> PFut,
        PFut: Future<Output = Result<T, RawFailure>>,
        B: FnOnce() -> BFut,
        BFut: Future<Output = Result<T, RawFailure>>,
    {
        let context = self.inner.default_context.merge(&context);
        let policy = &self.inner.policy;
        let mut last_error: Option<ClassifiedError> = None;

        for attempt in 1..=policy.max_attempts {
            match with_timeout(self.inner.timeouts.primary, primary()).await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(
                            attempts = attempt,
                            component = ?context.component,
                            action = ?context.action,
                            "Call recovered after retry"
                        );
                        metrics::record_recovery();
                        self.inner.log.record_event(ResilienceEvent {
                            kind: EventKind::Recovered { attempts: attempt },
                            context: context.clone(),
                            timestamp: now_millis(),
                        });
                    }
                    return Ok(value);
                }
                Err(raw) => {
                    let error = classify(&raw, self.is_online());
                    self.log_error(error.clone(), context.clone());

                    let retry = policy.should_retry(&error, attempt);
                    let code = error.code;
                    last_error = Some(error);
                    if !retry {
                        break;
                    }

                    let delay = policy.delay(attempt);
                    tracing::info!(attempt, delay = ?delay, code = %code, "Retrying call");
                    metrics::record_retry(code);
                    tokio::time::sleep(delay).await;
                }
            }
        }

        if let Some(fallback) = fallback {
            match with_timeout(self.inner.timeouts.fallback, fallback()).await {
                Ok(value) => {
                    tracing::info!(
                        component = ?context.component,
                        action = ?context.action,
                        "Fallback succeeded"
                    );
                    metrics::record_fallback(true);
                    self.inner.log.record_event(ResilienceEvent {
                        kind: EventKind::FallbackSucceeded,
                        context: context.clone(),
                        timestamp: now_millis(),
                    });
                    return Ok(value);
                }
                Err(raw) => {
                    metrics::record_fallback(false);
                    let error = classify(&raw, self.is_online());
                    self.log_error(error, context.merge(&ErrorContext::new().action("fallback")));
                }
            }
        }

        let err = match last_error {
            Some(error) => ResilientCallError::from_classified(error, context),
            None => ResilientCallError::service_unavailable(context),
        };
        tracing::error!(
            code = %err.code,
            severity = %err.severity,
            reason = err.technical_message(),
            "Call failed"
        );
        Err(err)
    }

    /// Run `online_call` unless the platform is offline, in which case
    /// `offline_value` is returned without attempting the call. The value is
    /// also the fallback when the call fails.
    pub async fn handle_offline_scenario<T, P, PFut>(
        &self,
        online_call: P,
        offline_value: T,
        context: ErrorContext,
    ) -> Result<T, ResilientCallError>
    where
        P: FnMut() -> PFut,
        PFut: Future<Output = Result<T, RawFailure>>,
    {
        if !self.is_online() {
            tracing::info!(component = ?context.component, "Offline, serving fallback value");
            return Ok(offline_value);
        }

        self.execute_with_fallback(online_call, move || async move { Ok(offline_value) }, context)
            .await
    }

    /// Log an application-level failure through the same path as failed attempts.
    pub fn report(&self, error: ClassifiedError, context: ErrorContext) {
        self.log_error(error, self.inner.default_context.merge(&context));
    }

    fn log_error(&self, error: ClassifiedError, context: ErrorContext) {
        tracing::warn!(
            code = %error.code,
            severity = %error.severity,
            component = ?context.component,
            action = ?context.action,
            message = %error.message,
            "Error recorded"
        );
        metrics::record_error(error.code, error.severity);

        let entry = ErrorLogEntry::new(error, context);
        if self.inner.mode == ExecutionMode::Production && entry.error.severity == Severity::Critical {
            if let Some(sink) = &self.inner.monitor {
                monitoring::dispatch(sink.clone(), entry.clone());
            }
        }
        self.inner.log.record_error(entry);
    }

    pub fn statistics(&self) -> ErrorStatistics {
        self.inner.log.statistics()
    }

    /// Retained failures, oldest first.
    pub fn entries(&self) -> Vec<ErrorLogEntry> {
        self.inner.log.entries()
    }

    /// Retained recovery and fallback events, oldest first.
    pub fn events(&self) -> Vec<ResilienceEvent> {
        self.inner.log.events()
    }

    pub fn clear_log(&self) {
        self.inner.log.clear();
    }

    pub async fn check_health(&self) -> HealthReport {
        let services = match &self.inner.health {
            Some(checker) => checker.check_all().await,
            None => BTreeMap::new(),
        };

        HealthReport {
            online: self.is_online(),
            recent_errors: self.inner.log.recent_errors(HEALTH_RECENT_ERRORS),
            services,
            timestamp: now_millis(),
        }
    }
}

/// Builder for `ResilientExecutor`.
pub struct ExecutorBuilder {
    policy: RetryPolicy,
    timeouts: TimeoutPolicy,
    log_capacity: usize,
    connectivity: Arc<dyn Connectivity>,
    mode: ExecutionMode,
    monitor: Option<Arc<dyn MonitoringSink>>,
    health: Option<HealthChecker>,
    default_context: ErrorContext,
}

impl Default for ExecutorBuilder {
    fn default() -> Self {
        Self {
            policy: RetryPolicy::default(),
            timeouts: TimeoutPolicy::default(),
            log_capacity: DEFAULT_LOG_CAPACITY,
            connectivity: Arc::new(AlwaysOnline),
            mode: ExecutionMode::default(),
            monitor: None,
            health: None,
            default_context: ErrorContext::default(),
        }
    }
}

impl ExecutorBuilder {
    pub fn policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn timeouts(mut self, timeouts: TimeoutPolicy) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Maximum number of logged failures and events kept. Zero is treated as one.
    pub fn log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    pub fn connectivity(mut self, connectivity: Arc<dyn Connectivity>) -> Self {
        self.connectivity = connectivity;
        self
    }

    pub fn mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn monitoring(mut self, sink: Arc<dyn MonitoringSink>) -> Self {
        self.monitor = Some(sink);
        self
    }

    pub fn health_checker(mut self, checker: HealthChecker) -> Self {
        self.health = Some(checker);
        self
    }

    /// Context merged under every call's own context.
    pub fn default_context(mut self, context: ErrorContext) -> Self {
        self.default_context = context;
        self
    }

    pub fn build(self) -> ResilientExecutor {
        ResilientExecutor {
            inner: Arc::new(ExecutorInner {
                policy: self.policy,
                timeouts: self.timeouts,
                log: ErrorLog::new(self.log_capacity),
                connectivity: self.connectivity,
                mode: self.mode,
                monitor: self.monitor,
                health: self.health,
                default_context: self.default_context,
            }),
        }
    }
}
