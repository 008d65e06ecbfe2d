//! Service error types with HTTP status code mapping.
//!
//! [`SwapError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//! A lost match-claim race is deliberately *not* represented here: the
//! coordinator absorbs it and reports a normal pending result.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "swap request not found: ...",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                |
/// |-----------|-----------------|----------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request            |
/// | 2000–2999 | State/Ownership | 404 Not Found / 403 Forbidden |
/// | 3000–3999 | Server/Storage  | 500 Internal Server Error  |
#[derive(Debug, thiserror::Error)]
pub enum SwapError {
    /// Swap request with the given ID was not found.
    #[error("swap request not found: {0}")]
    RequestNotFound(uuid::Uuid),

    /// The request does not exist or does not belong to the caller.
    #[error("request not found or does not belong to this user")]
    Unauthorized,

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Storage layer failure (I/O, transaction, connection).
    #[error("storage error: {0}")]
    StoreFailure(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SwapError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::RequestNotFound(_) => 2001,
            Self::Unauthorized => 2002,
            Self::StoreFailure(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::RequestNotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::StoreFailure(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for SwapError {
    fn from(err: sqlx::Error) -> Self {
        Self::StoreFailure(err.to_string())
    }
}

impl IntoResponse for SwapError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
