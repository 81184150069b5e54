//! Resilient API-call layer for the weather-safety dashboard.

pub mod config;
pub mod health;
pub mod http;
pub mod net;
pub mod observability;
pub mod resilience;

pub use config::schema::ResilienceConfig;
pub use resilience::{ErrorContext, RawFailure, ResilientCallError, ResilientExecutor};
