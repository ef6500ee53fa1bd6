//! Message HTTP Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::identity::RequesterId;
use crate::backend::service::ConversationService;
use crate::shared::messaging::{
    EditMessageRequest, ListMessagesParams, ListMessagesResponse, Message, ReactionRequest,
    SearchMessagesParams, SendMessageRequest,
};

/// Send a message to a conversation
pub async fn send_message(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Path(conversation_id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let message = service
        .create_message(conversation_id, user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// List messages, newest first, paginated by seq cursor
pub async fn list_messages(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Path(conversation_id): Path<Uuid>,
    Query(params): Query<ListMessagesParams>,
) -> Result<Json<ListMessagesResponse>, ApiError> {
    let response = service
        .list_messages(conversation_id, user_id, params.limit, params.before)
        .await?;
    Ok(Json(response))
}

/// Edit a message body
pub async fn edit_message(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Path(message_id): Path<Uuid>,
    Json(request): Json<EditMessageRequest>,
) -> Result<Json<Message>, ApiError> {
    let message = service.edit_message(message_id, user_id, request.body).await?;
    Ok(Json(message))
}

/// Response for a delete call
#[derive(Debug, serde::Serialize)]
pub struct DeleteMessageResponse {
    pub deleted: bool,
}

/// Soft-delete a message
pub async fn delete_message(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Path(message_id): Path<Uuid>,
) -> Result<Json<DeleteMessageResponse>, ApiError> {
    let deleted = service.delete_message(message_id, user_id).await?;
    Ok(Json(DeleteMessageResponse { deleted }))
}

/// Add a reaction
pub async fn add_reaction(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Path(message_id): Path<Uuid>,
    Json(request): Json<ReactionRequest>,
) -> Result<Json<Message>, ApiError> {
    let message = service
        .add_reaction(message_id, user_id, request.emoji)
        .await?;
    Ok(Json(message))
}

/// Remove a reaction
pub async fn remove_reaction(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Path(message_id): Path<Uuid>,
    Json(request): Json<ReactionRequest>,
) -> Result<Json<Message>, ApiError> {
    let message = service
        .remove_reaction(message_id, user_id, request.emoji)
        .await?;
    Ok(Json(message))
}

/// Response for a search call
#[derive(Debug, serde::Serialize)]
pub struct SearchMessagesResponse {
    pub messages: Vec<Message>,
}

/// Search messages across the caller's conversations
pub async fn search_messages(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Query(params): Query<SearchMessagesParams>,
) -> Result<Json<SearchMessagesResponse>, ApiError> {
    let messages = service.search_messages(user_id, params).await?;
    Ok(Json(SearchMessagesResponse { messages }))
}
