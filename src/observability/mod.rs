//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Executor and health checker produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!     → monitoring.rs (critical entries, production mode only)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//!     → External collector (/api/monitoring/error)
//! ```

pub mod logging;
pub mod metrics;
pub mod monitoring;
