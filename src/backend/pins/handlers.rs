//! Pin HTTP Handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::identity::RequesterId;
use crate::backend::service::ConversationService;
use crate::shared::messaging::Pin;

/// Response carrying the conversation's current pin list
#[derive(Debug, serde::Serialize)]
pub struct PinListResponse {
    pub pins: Vec<Pin>,
}

/// Pin a message
pub async fn pin_message(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Path((conversation_id, message_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<PinListResponse>, ApiError> {
    let pins = service
        .pin_message(conversation_id, message_id, user_id)
        .await?;
    Ok(Json(PinListResponse { pins }))
}

/// Unpin a message
pub async fn unpin_message(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Path((conversation_id, message_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<PinListResponse>, ApiError> {
    let pins = service
        .unpin_message(conversation_id, message_id, user_id)
        .await?;
    Ok(Json(PinListResponse { pins }))
}

/// List pins, newest first
pub async fn list_pins(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<PinListResponse>, ApiError> {
    let pins = service.list_pins(conversation_id, user_id).await?;
    Ok(Json(PinListResponse { pins }))
}
