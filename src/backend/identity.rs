//! Caller Identity Extraction
//!
//! Authentication is a boundary collaborator: an upstream gateway verifies
//! the caller and forwards the verified id in the `x-user-id` header. This
//! module only lifts that id into handlers; it never authenticates.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use super::error::ApiError;

/// Header carrying the verified caller id
pub const USER_ID_HEADER: &str = "x-user-id";

/// The verified caller of a request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequesterId(pub Uuid);

impl<S> FromRequestParts<S> for RequesterId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                tracing::warn!("[Api] request without {} header", USER_ID_HEADER);
                ApiError::MissingIdentity
            })?;

        let user_id = Uuid::parse_str(raw).map_err(|_| {
            tracing::warn!("[Api] malformed {} header", USER_ID_HEADER);
            ApiError::MissingIdentity
        })?;

        Ok(RequesterId(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_extracts_valid_header() {
        let user_id = Uuid::new_v4();
        let request = Request::builder()
            .header(USER_ID_HEADER, user_id.to_string())
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let extracted = RequesterId::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted, RequesterId(user_id));
    }

    #[tokio::test]
    async fn test_rejects_missing_header() {
        let request = Request::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let result = RequesterId::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::MissingIdentity)));
    }

    #[tokio::test]
    async fn test_rejects_malformed_header() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "not-a-uuid")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let result = RequesterId::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::MissingIdentity)));
    }
}
