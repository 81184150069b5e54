//! Network environment subsystem.
//!
//! # Data Flow
//! ```text
//! Host platform (online/offline signal)
//!     → connectivity.rs (Connectivity trait)
//!     → classifier (offline failures become NETWORK_ERROR)
//!     → offline wrapper (skip the call, serve the fallback value)
//!     → health report (online flag)
//! ```

pub mod connectivity;

pub use connectivity::{AlwaysOnline, Connectivity, ConnectivityFlag};
