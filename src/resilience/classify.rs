//! Failure classification.
//!
//! # Responsibilities
//! - Describe the shapes a failed call can take (`RawFailure`)
//! - Map every raw failure onto exactly one `ErrorCode`
//! - Translate codes into sentences fit for end users
//!
//! # Rules (first match wins)
//! ```text
//! Timeout                         → TIMEOUT        retryable  medium
//! Network, or client offline      → NETWORK_ERROR  retryable  high
//! HTTP 429                        → RATE_LIMITED   retryable  medium
//! HTTP >= 500                     → SERVER_ERROR   retryable  high
//! HTTP 404                        → NOT_FOUND      final      low
//! HTTP 401 / 403                  → AUTH_ERROR     final      medium
//! anything else                   → UNKNOWN_ERROR  final      medium
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed vocabulary of failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Timeout,
    NetworkError,
    RateLimited,
    ServerError,
    NotFound,
    AuthError,
    UnknownError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::ServerError => "SERVER_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::AuthError => "AUTH_ERROR",
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse priority of a failure. `Critical` entries are escalated to monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The ways a wrapped operation can fail before classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawFailure {
    /// The operation did not settle before its deadline.
    Timeout { after_ms: u64 },
    /// Transport-level failure (DNS, connect, reset).
    Network { message: String },
    /// The server answered with a non-success status.
    Http { status: u16, message: String },
    /// Anything else the operation reports.
    Other { message: String },
}

impl RawFailure {
    pub fn network(message: impl Into<String>) -> Self {
        RawFailure::Network { message: message.into() }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        RawFailure::Http { status, message: message.into() }
    }

    pub fn other(message: impl Into<String>) -> Self {
        RawFailure::Other { message: message.into() }
    }
}

impl fmt::Display for RawFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawFailure::Timeout { after_ms } => write!(f, "timed out after {}ms", after_ms),
            RawFailure::Network { message } => write!(f, "network failure: {}", message),
            RawFailure::Http { status, message } => write!(f, "HTTP {}: {}", status, message),
            RawFailure::Other { message } => f.write_str(message),
        }
    }
}

/// Normalized failure produced for every failed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedError {
    pub code: ErrorCode,
    pub message: String,
    /// The raw failure this was derived from, if any.
    pub details: Option<RawFailure>,
    pub retryable: bool,
    pub severity: Severity,
}

impl ClassifiedError {
    pub fn new(code: ErrorCode, message: impl Into<String>, retryable: bool, severity: Severity) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            retryable,
            severity,
        }
    }

    pub fn with_details(mut self, details: RawFailure) -> Self {
        self.details = Some(details);
        self
    }
}

/// Classify a raw failure. `online` is the platform connectivity at the time of failure.
pub fn classify(raw: &RawFailure, online: bool) -> ClassifiedError {
    let (code, message, retryable, severity) = match raw {
        RawFailure::Timeout { .. } => (ErrorCode::Timeout, "Request timed out".to_string(), true, Severity::Medium),
        RawFailure::Network { .. } => network_failure(),
        _ if !online => network_failure(),
        RawFailure::Http { status: 429, .. } => {
            (ErrorCode::RateLimited, "Too many requests".to_string(), true, Severity::Medium)
        }
        RawFailure::Http { status, .. } if *status >= 500 => {
            (ErrorCode::ServerError, format!("Server error ({})", status), true, Severity::High)
        }
        RawFailure::Http { status: 404, .. } => {
            (ErrorCode::NotFound, "Resource not found".to_string(), false, Severity::Low)
        }
        RawFailure::Http { status: 401 | 403, .. } => {
            (ErrorCode::AuthError, "Authentication required".to_string(), false, Severity::Medium)
        }
        RawFailure::Http { message, .. } | RawFailure::Other { message } => {
            let message = if message.is_empty() {
                "An unexpected error occurred".to_string()
            } else {
                message.clone()
            };
            (ErrorCode::UnknownError, message, false, Severity::Medium)
        }
    };

    ClassifiedError::new(code, message, retryable, severity).with_details(raw.clone())
}

fn network_failure() -> (ErrorCode, String, bool, Severity) {
    (ErrorCode::NetworkError, "Network connection failed".to_string(), true, Severity::High)
}

/// Sentence shown to end users for a classified failure.
pub fn user_message(error: &ClassifiedError) -> String {
    let fixed = match error.code {
        ErrorCode::NetworkError => "No internet connection. Please check your network and try again.",
        ErrorCode::Timeout => "The request took too long to complete. Please try again.",
        ErrorCode::RateLimited => "Too many requests. Please wait a moment and try again.",
        ErrorCode::ServerError => "Our servers are having trouble right now. Please try again later.",
        ErrorCode::NotFound => "The requested information could not be found.",
        ErrorCode::AuthError => "Please sign in again to continue.",
        ErrorCode::UnknownError => return error.message.clone(),
    };
    fixed.to_string()
}
