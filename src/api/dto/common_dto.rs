//! Shared DTO types used across multiple endpoints.

use serde::Serialize;
use utoipa::ToSchema;

/// Generic status/message response for operations with no payload
/// (deletion, onboarding).
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusMessageResponse {
    /// Operation status, `"success"` on the happy path.
    pub status: String,
    /// Human-readable outcome message.
    pub message: String,
}

impl StatusMessageResponse {
    /// Builds a `"success"` response with the given message.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}
