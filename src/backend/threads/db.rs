//! Database operations for thread views
//!
//! Threads are computed from the canonical message list on every read; there
//! is no persisted thread aggregate to keep consistent on the write side.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::shared::messaging::{Message, ThreadSummary};

use super::super::messages::db::{get_message, load_reactions, message_from_row};

/// Live (non-deleted) replies under a thread root, oldest first
pub async fn list_replies(
    pool: &SqlitePool,
    root_id: Uuid,
    limit: i64,
) -> Result<Vec<Message>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, conversation_id, seq, author_id, body, asset_id, reply_to_id, thread_root_id, is_system, created_at, edited_at, deleted_at
        FROM messages
        WHERE thread_root_id = ? AND deleted_at IS NULL
        ORDER BY seq ASC
        LIMIT ?
        "#,
    )
    .bind(root_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let mut messages = Vec::with_capacity(rows.len());
    for row in rows {
        let id: Uuid = row.get("id");
        let reactions = load_reactions(pool, id).await?;
        messages.push(message_from_row(&row, reactions));
    }
    Ok(messages)
}

/// Count of live replies under a root
pub async fn reply_count(pool: &SqlitePool, root_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) as count
        FROM messages
        WHERE thread_root_id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(root_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get("count"))
}

/// Lightweight thread summary: live reply count, latest reply time, authors
pub async fn thread_summary(
    pool: &SqlitePool,
    root_id: Uuid,
) -> Result<ThreadSummary, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) as count, MAX(created_at) as last_reply_at
        FROM messages
        WHERE thread_root_id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(root_id)
    .fetch_one(pool)
    .await?;

    let reply_count: i64 = row.get("count");
    let last_reply_at: Option<DateTime<Utc>> = row.get("last_reply_at");

    let participant_rows = sqlx::query(
        r#"
        SELECT DISTINCT author_id
        FROM messages
        WHERE thread_root_id = ? AND deleted_at IS NULL
        ORDER BY author_id ASC
        "#,
    )
    .bind(root_id)
    .fetch_all(pool)
    .await?;

    Ok(ThreadSummary {
        reply_count,
        last_reply_at,
        participant_ids: participant_rows
            .into_iter()
            .map(|r| r.get("author_id"))
            .collect(),
    })
}

/// Fetch a thread root, verifying it belongs to the given conversation
///
/// A soft-deleted root still resolves; its replies remain addressable.
pub async fn get_root(
    pool: &SqlitePool,
    conversation_id: Uuid,
    root_id: Uuid,
) -> Result<Option<Message>, sqlx::Error> {
    let message = get_message(pool, root_id).await?;
    Ok(message.filter(|m| m.conversation_id == conversation_id))
}
