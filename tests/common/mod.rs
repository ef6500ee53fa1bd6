//! Shared test helpers: in-memory store, service construction, fixtures
#![allow(dead_code)]

use chrono::{Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use confab::backend::realtime::ConversationFanout;
use confab::backend::service::ConversationService;
use confab::shared::messaging::{
    Conversation, CreateConversationRequest, Message, SendMessageRequest,
};

/// Fresh in-memory database with migrations applied
///
/// A single connection keeps the in-memory database alive for the pool's
/// lifetime.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory database");
    sqlx::migrate!().run(&pool).await.expect("run migrations");
    pool
}

/// Service over a fresh in-memory store
pub async fn test_service() -> ConversationService {
    ConversationService::new(test_pool().await, ConversationFanout::default())
}

pub fn uid() -> Uuid {
    Uuid::new_v4()
}

/// Create a direct conversation between `a` (creator/admin) and `b`
pub async fn direct_conversation(
    service: &ConversationService,
    a: Uuid,
    b: Uuid,
) -> Conversation {
    service
        .create_conversation(
            a,
            CreateConversationRequest {
                member_ids: vec![b],
                is_group: false,
                name: None,
                project_id: None,
                organization_id: None,
            },
        )
        .await
        .expect("create direct conversation")
}

/// Create a named group conversation
pub async fn group_conversation(
    service: &ConversationService,
    creator: Uuid,
    others: &[Uuid],
    name: &str,
) -> Conversation {
    service
        .create_conversation(
            creator,
            CreateConversationRequest {
                member_ids: others.to_vec(),
                is_group: true,
                name: Some(name.to_string()),
                project_id: None,
                organization_id: None,
            },
        )
        .await
        .expect("create group conversation")
}

/// Send a plain text message
pub async fn send_text(
    service: &ConversationService,
    conversation_id: Uuid,
    author: Uuid,
    body: &str,
) -> Message {
    service
        .create_message(
            conversation_id,
            author,
            SendMessageRequest {
                body: Some(body.to_string()),
                asset_id: None,
                reply_to_id: None,
            },
        )
        .await
        .expect("send message")
}

/// Send a reply to another message
pub async fn send_reply(
    service: &ConversationService,
    conversation_id: Uuid,
    author: Uuid,
    body: &str,
    reply_to: Uuid,
) -> Message {
    service
        .create_message(
            conversation_id,
            author,
            SendMessageRequest {
                body: Some(body.to_string()),
                asset_id: None,
                reply_to_id: Some(reply_to),
            },
        )
        .await
        .expect("send reply")
}

/// Move a message's creation time into the past (edit-window tests)
pub async fn backdate_message(pool: &SqlitePool, message_id: Uuid, by: Duration) {
    sqlx::query("UPDATE messages SET created_at = $1 WHERE id = $2")
        .bind(Utc::now() - by)
        .bind(message_id)
        .execute(pool)
        .await
        .expect("backdate message");
}
