//! Error returned when a resilient call fails for good.

use thiserror::Error;

use crate::resilience::classify::{user_message, ClassifiedError, ErrorCode, Severity};
use crate::resilience::context::ErrorContext;

/// Shown when no classified failure is available to describe the outcome.
pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "Service temporarily unavailable. Please try again later.";

/// Final failure of `execute`: a user-facing message plus the structured
/// fields telemetry needs.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ResilientCallError {
    /// Sentence fit for end users.
    pub message: String,
    pub code: ErrorCode,
    pub severity: Severity,
    pub context: ErrorContext,
    /// The last classified failure of the primary call.
    pub last_error: Option<ClassifiedError>,
}

impl ResilientCallError {
    pub fn from_classified(error: ClassifiedError, context: ErrorContext) -> Self {
        Self {
            message: user_message(&error),
            code: error.code,
            severity: error.severity,
            context,
            last_error: Some(error),
        }
    }

    pub fn service_unavailable(context: ErrorContext) -> Self {
        Self {
            message: SERVICE_UNAVAILABLE_MESSAGE.to_string(),
            code: ErrorCode::UnknownError,
            severity: Severity::High,
            context,
            last_error: None,
        }
    }

    /// Technical description of the underlying failure, for logs.
    pub fn technical_message(&self) -> &str {
        self.last_error
            .as_ref()
            .map(|e| e.message.as_str())
            .unwrap_or(SERVICE_UNAVAILABLE_MESSAGE)
    }
}
