//! Read-state HTTP Handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::identity::RequesterId;
use crate::backend::service::ConversationService;
use crate::shared::messaging::{MarkReadRequest, MarkReadResponse, ReadState};

/// Advance the caller's read cursor
pub async fn mark_read(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Path(conversation_id): Path<Uuid>,
    Json(request): Json<MarkReadRequest>,
) -> Result<Json<MarkReadResponse>, ApiError> {
    let updated = service
        .mark_read(conversation_id, user_id, request.last_read_message_id)
        .await?;
    Ok(Json(MarkReadResponse { updated }))
}

/// Read cursors of every member
pub async fn read_states(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<Vec<ReadState>>, ApiError> {
    let states = service
        .conversation_read_states(conversation_id, user_id)
        .await?;
    Ok(Json(states))
}
