//! Health reporting subsystem.
//!
//! # Data Flow
//! ```text
//! check_health():
//!     Connectivity → online flag
//!     Error log → 5 most recent classified errors
//!     active.rs → HEAD <base>/api/health/<service> per capability (concurrent)
//!     → state.rs (HealthReport)
//! ```
//!
//! # Design Decisions
//! - Probes are independent; one failing probe never affects another
//! - Health results do not feed back into retry decisions

pub mod active;
pub mod state;

pub use active::HealthChecker;
pub use state::{HealthReport, ServiceStatus};
