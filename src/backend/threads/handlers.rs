//! Thread HTTP Handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::identity::RequesterId;
use crate::backend::service::ConversationService;
use crate::shared::messaging::{ListThreadParams, ThreadSummary, ThreadView};

/// List a thread: root plus live replies, oldest first
pub async fn thread_messages(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Path((conversation_id, root_id)): Path<(Uuid, Uuid)>,
    Query(params): Query<ListThreadParams>,
) -> Result<Json<ThreadView>, ApiError> {
    let thread = service
        .thread_messages(conversation_id, root_id, user_id, params.limit)
        .await?;
    Ok(Json(thread))
}

/// Lightweight thread summary
pub async fn thread_summary(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Path((conversation_id, root_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ThreadSummary>, ApiError> {
    let summary = service
        .thread_summary(conversation_id, root_id, user_id)
        .await?;
    Ok(Json(summary))
}
