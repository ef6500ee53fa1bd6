//! Backend Error Types
//!
//! This module wraps the service error taxonomy for the HTTP surface. Each
//! taxonomy kind maps to one status code; internal details never reach the
//! client.
//!
//! # Status Code Mapping
//!
//! - `Validation` - 400 Bad Request
//! - `NotFound` - 404 Not Found (also used when the caller lacks visibility)
//! - `Unauthorized` - 403 Forbidden (identity is known, permission is not)
//! - `EditWindowExpired` - 409 Conflict
//! - `RateLimited` - 429 Too Many Requests
//! - `UpstreamUnavailable` - 503 Service Unavailable
//! - `Internal` - 500 Internal Server Error, generic body
//!
//! A missing or malformed identity header is the one case produced by the
//! HTTP layer itself and maps to 401 Unauthorized.

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::ServiceError;

/// Errors returned by HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// A service operation failed
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The request carried no verified caller identity
    #[error("missing or invalid caller identity")]
    MissingIdentity,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingIdentity => StatusCode::UNAUTHORIZED,
            Self::Service(err) => match err {
                ServiceError::Validation { .. } => StatusCode::BAD_REQUEST,
                ServiceError::NotFound => StatusCode::NOT_FOUND,
                ServiceError::Unauthorized { .. } => StatusCode::FORBIDDEN,
                ServiceError::EditWindowExpired => StatusCode::CONFLICT,
                ServiceError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
                ServiceError::UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
                ServiceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Get the client-facing error message
    ///
    /// Internal errors are logged with their detail and surfaced generically.
    pub fn message(&self) -> String {
        match self {
            Self::Service(ServiceError::Internal { message }) => {
                tracing::error!("[Api] internal error: {}", message);
                String::from("internal error")
            }
            other => other.to_string(),
        }
    }
}
