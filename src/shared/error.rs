//! Service Error Taxonomy
//!
//! This module defines the error kinds surfaced by the conversation service.
//! Store-layer failures (sqlx) are translated into this taxonomy at the
//! service boundary; handlers map each kind to an HTTP status.
//!
//! # Error Categories
//!
//! - `Validation` - malformed or missing required fields
//! - `NotFound` - entity absent, or the caller lacks visibility; the two are
//!   never distinguished so membership cannot be probed
//! - `Unauthorized` - caller lacks permission for a mutation they can see
//! - `EditWindowExpired` - time-based edit policy violation
//! - `RateLimited` - caller exceeded the search budget
//! - `UpstreamUnavailable` - an optional collaborator is down
//! - `Internal` - unexpected failure, logged and surfaced generically

use thiserror::Error;

/// Errors surfaced by conversation service operations
#[derive(Debug, Error, Clone)]
pub enum ServiceError {
    /// Data validation error
    #[error("validation error in field '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Entity absent or invisible to the caller
    ///
    /// Deliberately carries no detail. A conversation the caller is not a
    /// member of produces the same error as a conversation that does not
    /// exist.
    #[error("not found")]
    NotFound,

    /// Caller lacks permission for a mutation on a visible entity
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// Human-readable error message
        message: String,
    },

    /// Message edit attempted outside the allowed window
    #[error("edit window expired")]
    EditWindowExpired,

    /// Caller exceeded a per-user request budget
    #[error("rate limited, retry in {retry_after_secs}s")]
    RateLimited {
        /// Seconds until the current window resets
        retry_after_secs: u64,
    },

    /// An optional collaborator (summary service, etc.) failed
    #[error("upstream unavailable: {service}")]
    UpstreamUnavailable {
        /// Name of the failing collaborator
        service: String,
    },

    /// Unexpected internal failure
    #[error("internal error: {message}")]
    Internal {
        /// Diagnostic message, never sent verbatim to clients
        message: String,
    },
}

impl ServiceError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a new upstream-unavailable error
    pub fn upstream(service: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            service: service.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Translate store-layer errors at the service boundary
///
/// `RowNotFound` becomes the opaque `NotFound`; everything else is an
/// internal failure whose detail stays server-side.
impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            other => Self::internal(format!("database error: {}", other)),
        }
    }
}
