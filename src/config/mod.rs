//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ResilienceConfig (validated, immutable)
//!     → ResilientExecutor::from_config
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the retry policy is fixed for the
//!   lifetime of the executor built from it
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, override_base_url, ConfigError};
pub use schema::ResilienceConfig;
pub use schema::{
    ApiConfig, ExecutionMode, HealthCheckConfig, LogFormat, MonitoringConfig,
    ObservabilityConfig, RetryConfig, TimeoutConfig,
};
