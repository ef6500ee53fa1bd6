//! Database operations for read cursors and unread counts
//!
//! The cursor is the `seq` of the last message a member has seen. Advancing
//! it is monotonic at the SQL level: the UPDATE only matches when the new
//! seq is ahead of the stored one, so out-of-order calls cannot regress it.

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::shared::messaging::ReadState;

/// Advance a member's read cursor; returns 1 if the cursor moved
pub async fn advance_cursor(
    pool: &SqlitePool,
    conversation_id: Uuid,
    user_id: Uuid,
    seq: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE conversation_members
        SET last_read_seq = ?, last_read_at = ?
        WHERE conversation_id = ? AND user_id = ?
          AND (last_read_seq IS NULL OR last_read_seq < ?)
        "#,
    )
    .bind(seq)
    .bind(chrono::Utc::now())
    .bind(conversation_id)
    .bind(user_id)
    .bind(seq)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Read cursors for every member of a conversation
///
/// The stored seq is resolved back to a message id; a cursor pointing at a
/// seq whose message row is gone resolves to `None`.
pub async fn read_states(
    pool: &SqlitePool,
    conversation_id: Uuid,
) -> Result<Vec<ReadState>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT cm.user_id, cm.last_read_at, m.id as last_read_message_id
        FROM conversation_members cm
        LEFT JOIN messages m
            ON m.conversation_id = cm.conversation_id AND m.seq = cm.last_read_seq
        WHERE cm.conversation_id = ?
        ORDER BY cm.joined_at ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ReadState {
            user_id: row.get("user_id"),
            last_read_message_id: row.get("last_read_message_id"),
            last_read_at: row.get("last_read_at"),
        })
        .collect())
}

/// Unread count for one member: messages after their cursor, authored by
/// someone else, not soft-deleted
pub async fn unread_count(
    pool: &SqlitePool,
    conversation_id: Uuid,
    user_id: Uuid,
) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) as count
        FROM messages
        WHERE conversation_id = ?
          AND deleted_at IS NULL
          AND author_id != ?
          AND seq > COALESCE(
                (SELECT last_read_seq FROM conversation_members
                 WHERE conversation_id = ? AND user_id = ?), 0)
        "#,
    )
    .bind(conversation_id)
    .bind(user_id)
    .bind(conversation_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get("count"))
}
