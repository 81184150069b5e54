//! Bounded in-memory failure log.
//!
//! # Responsibilities
//! - Keep the most recent failures (oldest evicted first)
//! - Keep recovery and fallback events apart from failures
//! - Aggregate statistics for reporting
//!
//! # Design Decisions
//! - A `VecDeque` per record kind behind one `Mutex`; the lock is never held
//!   across an await point
//! - Read-side only: the executor never consults the log to make retry decisions

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use serde::Serialize;

use crate::resilience::classify::{ClassifiedError, ErrorCode, Severity};
use crate::resilience::context::ErrorContext;

/// Default number of records retained per kind.
pub const DEFAULT_LOG_CAPACITY: usize = 100;

/// Number of entries returned verbatim by `statistics`.
pub const RECENT_STATISTICS: usize = 10;

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// One logged failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorLogEntry {
    pub error: ClassifiedError,
    pub context: ErrorContext,
    pub timestamp: u64,
}

impl ErrorLogEntry {
    pub fn new(error: ClassifiedError, context: ErrorContext) -> Self {
        Self {
            error,
            context,
            timestamp: now_millis(),
        }
    }
}

/// Non-error outcomes worth recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// The primary call succeeded after `attempts` tries.
    Recovered { attempts: u32 },
    /// The primary call was exhausted and the fallback produced the result.
    FallbackSucceeded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResilienceEvent {
    #[serde(flatten)]
    pub kind: EventKind,
    pub context: ErrorContext,
    pub timestamp: u64,
}

/// Aggregated view over the current log.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorStatistics {
    pub total_errors: usize,
    pub by_code: BTreeMap<ErrorCode, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
    /// Most recent entries, oldest first.
    pub recent: Vec<ErrorLogEntry>,
    pub recoveries: usize,
    pub fallback_successes: usize,
}

#[derive(Debug, Default)]
struct LogInner {
    errors: VecDeque<ErrorLogEntry>,
    events: VecDeque<ResilienceEvent>,
}

/// Ring-buffer log shared by every call of an executor.
#[derive(Debug)]
pub struct ErrorLog {
    capacity: usize,
    inner: Mutex<LogInner>,
}

impl Default for ErrorLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl ErrorLog {
    /// A capacity of zero is raised to one so the latest failure is always kept.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(LogInner::default()),
        }
    }

    /// Append a failure, evicting the oldest entries beyond capacity.
    pub fn record_error(&self, entry: ErrorLogEntry) {
        let mut inner = self.inner.lock().expect("error log mutex poisoned");
        inner.errors.push_back(entry);
        while inner.errors.len() > self.capacity {
            inner.errors.pop_front();
        }
    }

    pub fn record_event(&self, event: ResilienceEvent) {
        let mut inner = self.inner.lock().expect("error log mutex poisoned");
        inner.events.push_back(event);
        while inner.events.len() > self.capacity {
            inner.events.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("error log mutex poisoned").errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All retained failures, oldest first.
    pub fn entries(&self) -> Vec<ErrorLogEntry> {
        let inner = self.inner.lock().expect("error log mutex poisoned");
        inner.errors.iter().cloned().collect()
    }

    /// All retained events, oldest first.
    pub fn events(&self) -> Vec<ResilienceEvent> {
        let inner = self.inner.lock().expect("error log mutex poisoned");
        inner.events.iter().cloned().collect()
    }

    /// The `n` most recent classified errors, oldest first.
    pub fn recent_errors(&self, n: usize) -> Vec<ClassifiedError> {
        let inner = self.inner.lock().expect("error log mutex poisoned");
        let skip = inner.errors.len().saturating_sub(n);
        inner.errors.iter().skip(skip).map(|e| e.error.clone()).collect()
    }

    pub fn statistics(&self) -> ErrorStatistics {
        let inner = self.inner.lock().expect("error log mutex poisoned");

        let mut stats = ErrorStatistics {
            total_errors: inner.errors.len(),
            ..Default::default()
        };
        for entry in &inner.errors {
            *stats.by_code.entry(entry.error.code).or_insert(0) += 1;
            *stats.by_severity.entry(entry.error.severity).or_insert(0) += 1;
        }

        let skip = inner.errors.len().saturating_sub(RECENT_STATISTICS);
        stats.recent = inner.errors.iter().skip(skip).cloned().collect();

        for event in &inner.events {
            match event.kind {
                EventKind::Recovered { .. } => stats.recoveries += 1,
                EventKind::FallbackSucceeded => stats.fallback_successes += 1,
            }
        }
        stats
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().expect("error log mutex poisoned");
        inner.errors.clear();
        inner.events.clear();
    }
}
