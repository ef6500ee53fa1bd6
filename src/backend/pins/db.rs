//! Database operations for pinned messages

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::shared::messaging::Pin;

/// How many pins a listing returns, newest pin first
pub const PIN_LIST_LIMIT: i64 = 20;

/// Pin a message; a no-op if already pinned in this conversation
pub async fn insert_pin(
    pool: &SqlitePool,
    conversation_id: Uuid,
    message_id: Uuid,
    pinned_by: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO pins (conversation_id, message_id, pinned_by, pinned_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (conversation_id, message_id) DO NOTHING
        "#,
    )
    .bind(conversation_id)
    .bind(message_id)
    .bind(pinned_by)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Unpin a message; a no-op if not pinned
pub async fn delete_pin(
    pool: &SqlitePool,
    conversation_id: Uuid,
    message_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM pins
        WHERE conversation_id = ? AND message_id = ?
        "#,
    )
    .bind(conversation_id)
    .bind(message_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// List the most recent pins in a conversation, bounded by `PIN_LIST_LIMIT`
pub async fn list_pins(
    pool: &SqlitePool,
    conversation_id: Uuid,
) -> Result<Vec<Pin>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT conversation_id, message_id, pinned_by, pinned_at
        FROM pins
        WHERE conversation_id = ?
        ORDER BY pinned_at DESC
        LIMIT ?
        "#,
    )
    .bind(conversation_id)
    .bind(PIN_LIST_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Pin {
            conversation_id: row.get("conversation_id"),
            message_id: row.get("message_id"),
            pinned_by: row.get("pinned_by"),
            pinned_at: row.get("pinned_at"),
        })
        .collect())
}
