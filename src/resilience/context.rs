//! Diagnostic context attached to logged failures.

use serde::{Deserialize, Serialize};

/// Geographic coordinate of the user when the failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Descriptive metadata for one call. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorContext {
    pub component: Option<String>,
    pub action: Option<String>,
    pub user_id: Option<String>,
    pub location: Option<GeoPoint>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: Option<u64>,
    pub client_id: Option<String>,
    pub url: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn location(mut self, latitude: f64, longitude: f64) -> Self {
        self.location = Some(GeoPoint { latitude, longitude });
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Shallow merge: fields set on `overrides` replace ours.
    pub fn merge(&self, overrides: &ErrorContext) -> ErrorContext {
        ErrorContext {
            component: overrides.component.clone().or_else(|| self.component.clone()),
            action: overrides.action.clone().or_else(|| self.action.clone()),
            user_id: overrides.user_id.clone().or_else(|| self.user_id.clone()),
            location: overrides.location.or(self.location),
            timestamp: overrides.timestamp.or(self.timestamp),
            client_id: overrides.client_id.clone().or_else(|| self.client_id.clone()),
            url: overrides.url.clone().or_else(|| self.url.clone()),
        }
    }
}
