//! Error Conversion
//!
//! This module implements `IntoResponse` for backend errors so handlers can
//! return them directly.
//!
//! # Response Format
//!
//! Error responses are returned as JSON:
//! ```json
//! {
//!   "error": "validation error in field 'name': ...",
//!   "status": 400
//! }
//! ```

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap_or_else(|_| {
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Body::from("Internal Server Error"))
                    .expect("static response")
            })
    }
}
