//! Service error types with HTTP status code mapping.
//!
//! [`StatsError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//! Upstream and parse failures only ever abort a refresh cycle; they carry
//! a status mapping so the enum stays total, but no handler returns them.

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
///     "code": 1001,
///     "message": "invalid request: coin parameter is required"
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
    /// Numeric error code (see the table on [`StatsError`]).
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
/// | Range     | Category         | HTTP Status               |
/// |-----------|------------------|---------------------------|
/// | 1000–1999 | Validation       | 400 Bad Request           |
/// | 2000–2999 | Not Found        | 404 Not Found             |
/// | 3000–3999 | Server           | 500 Internal Server Error |
/// | 5000–5999 | Upstream         | 502 Bad Gateway           |
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// Request validation failed (e.g. missing `coin` parameter).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Not enough stored prices to compute a deviation.
    #[error("not enough records for {coin}: found {found}, need at least {required}")]
    InsufficientData {
        /// Requested coin identifier.
        coin: String,
        /// Number of prices found.
        found: usize,
        /// Minimum number of prices required.
        required: usize,
    },

    /// No snapshot exists for the requested coin.
    #[error("no data found for coin: {0}")]
    CoinNotFound(String),

    /// Database unavailable or a query failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Price API request failed, timed out, or returned a non-success status.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Price API response was malformed or lacked the requested coins.
    #[error("parse error: {0}")]
    Parse(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StatsError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InsufficientData { .. } => 1002,
            Self::CoinNotFound(_) => 2001,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
            Self::Upstream(_) => 5001,
            Self::Parse(_) => 5002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InsufficientData { .. } => StatusCode::BAD_REQUEST,
            Self::CoinNotFound(_) => StatusCode::NOT_FOUND,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) | Self::Parse(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<sqlx::Error> for StatsError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl IntoResponse for StatsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
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
