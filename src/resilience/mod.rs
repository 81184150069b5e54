//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call through the executor:
//!     → timeouts.rs (enforce primary/fallback deadline)
//!     → On failure: classify.rs (map to an ErrorCode, severity)
//!     → log.rs (append to the bounded failure log)
//!     → retries.rs (double gate, backoff.rs delay)
//!     → executor.rs (fallback once, or ResilientCallError)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every attempt has a deadline
//! - Classification is total; `UNKNOWN_ERROR` catches everything else
//! - Individual attempt failures never escape `execute`

pub mod backoff;
pub mod classify;
pub mod context;
pub mod error;
pub mod executor;
pub mod log;
pub mod retries;
pub mod timeouts;

pub use classify::{classify, user_message, ClassifiedError, ErrorCode, RawFailure, Severity};
pub use context::{ErrorContext, GeoPoint};
pub use error::ResilientCallError;
pub use executor::{ExecutorBuilder, ResilientExecutor};
pub use log::{ErrorLogEntry, ErrorStatistics, EventKind, ResilienceEvent};
pub use retries::RetryPolicy;
pub use timeouts::TimeoutPolicy;
