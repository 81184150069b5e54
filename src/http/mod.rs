//! Outbound HTTP layer.
//!
//! # Data Flow
//! ```text
//! Caller → ApiClient::get_json(path)
//!     → reqwest request against <base_url><path>
//!     → Ok(decoded body) | Err(RawFailure)
//!     → ResilientExecutor classifies, retries, falls back
//! ```

pub mod client;

pub use client::ApiClient;
