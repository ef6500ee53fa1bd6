//! Conversation HTTP Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::identity::RequesterId;
use crate::backend::service::summary::ConversationSummary;
use crate::backend::service::ConversationService;
use crate::shared::messaging::{
    AddMemberRequest, Conversation, CreateConversationRequest, ListConversationsParams,
    ListConversationsResponse, Member, RemoveMemberResponse, UpdateConversationRequest,
};

/// Create a conversation
pub async fn create_conversation(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Json(request): Json<CreateConversationRequest>,
) -> Result<(StatusCode, Json<Conversation>), ApiError> {
    let conversation = service.create_conversation(user_id, request).await?;
    Ok((StatusCode::CREATED, Json(conversation)))
}

/// List the caller's conversations
pub async fn list_conversations(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Query(params): Query<ListConversationsParams>,
) -> Result<Json<ListConversationsResponse>, ApiError> {
    let conversations = service
        .list_conversations(user_id, params.limit, params.offset, params.project_id)
        .await?;
    Ok(Json(ListConversationsResponse { conversations }))
}

/// Get one conversation
pub async fn get_conversation(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<Conversation>, ApiError> {
    let conversation = service.get_conversation(conversation_id, user_id).await?;
    Ok(Json(conversation))
}

/// Update a conversation's mutable fields
pub async fn update_conversation(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Path(conversation_id): Path<Uuid>,
    Json(patch): Json<UpdateConversationRequest>,
) -> Result<Json<Conversation>, ApiError> {
    let conversation = service
        .update_conversation(conversation_id, user_id, patch)
        .await?;
    Ok(Json(conversation))
}

/// Add a member
pub async fn add_member(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Path(conversation_id): Path<Uuid>,
    Json(request): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<Member>), ApiError> {
    let member = service
        .add_member(conversation_id, user_id, request.user_id, request.admin)
        .await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// Remove a member; removing an absent member reports `removed: 0`
pub async fn remove_member(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Path((conversation_id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<RemoveMemberResponse>, ApiError> {
    let removed = service
        .remove_member(conversation_id, user_id, member_id)
        .await?;
    Ok(Json(RemoveMemberResponse { removed }))
}

/// Request body for the mute toggle
#[derive(Debug, serde::Deserialize)]
pub struct MuteRequest {
    pub muted: bool,
}

/// Mute or unmute the conversation for the caller
pub async fn set_muted(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Path(conversation_id): Path<Uuid>,
    Json(request): Json<MuteRequest>,
) -> Result<StatusCode, ApiError> {
    service
        .set_muted(conversation_id, user_id, request.muted)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Summarize recent conversation history via the optional collaborator
pub async fn summarize_conversation(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<ConversationSummary>, ApiError> {
    let summary = service
        .summarize_conversation(conversation_id, user_id)
        .await?;
    Ok(Json(summary))
}
