//! API error taxonomy.
//!
//! One closed enum covers every failure a pipeline stage or handler can
//! produce, so stages dispatch on error kind rather than message text. Each
//! variant owns its HTTP status; the JSON body carries a machine-readable
//! code plus a human-readable message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::store::StoreError;

/// Failures surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing input → 400.
    #[error("{0}")]
    Validation(String),

    /// Bad, expired or not-yet-valid credential → 401.
    #[error(transparent)]
    Authentication(AuthError),

    /// Insufficient clearance and no ownership → 403.
    #[error("insufficient clearance and no ownership of the target resource")]
    Authorization,

    /// The resource id has no matching row → 404.
    #[error("resource not found")]
    NotFound,

    /// Request body exceeds the configured limit → 413.
    #[error("request body exceeds the {limit} byte limit")]
    PayloadTooLarge {
        /// The configured byte limit.
        limit: u64,
    },

    /// Unexpected affected-row count on an update → 500.
    #[error("storage conflict: {0}")]
    Conflict(String),

    /// Store or transport failure → 500.
    #[error("internal failure: {0}")]
    Internal(String),
}

impl ApiError {
    /// The HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Authorization => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Conflict(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The machine-readable code serialized into the body.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::Authentication(_) => "AUTHENTICATION",
            Self::Authorization => "AUTHORIZATION",
            Self::NotFound => "NOT_FOUND",
            Self::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            // A hasher failure is a server fault, not a credential fault.
            AuthError::Hashing(message) => Self::Internal(message),
            other => Self::Authentication(other),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::NotFound,
            StoreError::Conflict { rows } => {
                Self::Conflict(format!("update affected {rows} rows, expected 1"))
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

/// JSON body written for every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub code: &'static str,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        }
        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
