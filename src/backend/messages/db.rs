//! Database operations for messages
//!
//! This module contains the message store: message rows with their
//! per-conversation sequence numbers, soft-delete state, reactions, and the
//! membership-restricted search query.

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::shared::messaging::{Message, ReactionMap};

pub(crate) fn message_from_row(row: &sqlx::sqlite::SqliteRow, reactions: ReactionMap) -> Message {
    Message {
        id: row.get("id"),
        conversation_id: row.get("conversation_id"),
        seq: row.get("seq"),
        author_id: row.get("author_id"),
        body: row.get("body"),
        asset_id: row.get("asset_id"),
        reply_to_id: row.get("reply_to_id"),
        thread_root_id: row.get("thread_root_id"),
        is_system: row.get("is_system"),
        created_at: row.get("created_at"),
        edited_at: row.get("edited_at"),
        deleted_at: row.get("deleted_at"),
        reactions,
    }
}

const MESSAGE_COLUMNS: &str = "id, conversation_id, seq, author_id, body, asset_id, reply_to_id, thread_root_id, is_system, created_at, edited_at, deleted_at";

/// Load the reaction map for one message
pub async fn load_reactions(
    pool: &SqlitePool,
    message_id: Uuid,
) -> Result<ReactionMap, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT user_id, emoji
        FROM message_reactions
        WHERE message_id = ?
        ORDER BY created_at ASC
        "#,
    )
    .bind(message_id)
    .fetch_all(pool)
    .await?;

    let mut reactions = ReactionMap::new();
    for row in rows {
        let emoji: String = row.get("emoji");
        let user_id: Uuid = row.get("user_id");
        reactions.entry(emoji).or_default().push(user_id);
    }
    Ok(reactions)
}

/// Store a message, assigning the next sequence number in the conversation
/// and bumping the conversation's activity timestamp, in one transaction
#[allow(clippy::too_many_arguments)]
pub async fn create_message(
    pool: &SqlitePool,
    id: Uuid,
    conversation_id: Uuid,
    author_id: Uuid,
    body: Option<&str>,
    asset_id: Option<&str>,
    reply_to_id: Option<Uuid>,
    thread_root_id: Option<Uuid>,
    is_system: bool,
) -> Result<Message, sqlx::Error> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let seq: i64 = sqlx::query(
        r#"
        SELECT COALESCE(MAX(seq), 0) + 1 as next_seq
        FROM messages
        WHERE conversation_id = ?
        "#,
    )
    .bind(conversation_id)
    .fetch_one(&mut *tx)
    .await?
    .get("next_seq");

    sqlx::query(
        r#"
        INSERT INTO messages (id, conversation_id, seq, author_id, body, asset_id, reply_to_id, thread_root_id, is_system, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(conversation_id)
    .bind(seq)
    .bind(author_id)
    .bind(body)
    .bind(asset_id)
    .bind(reply_to_id)
    .bind(thread_root_id)
    .bind(is_system)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE conversations SET last_activity_at = ? WHERE id = ?
        "#,
    )
    .bind(now)
    .bind(conversation_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Message {
        id,
        conversation_id,
        seq,
        author_id,
        body: body.map(String::from),
        asset_id: asset_id.map(String::from),
        reply_to_id,
        thread_root_id,
        is_system,
        created_at: now,
        edited_at: None,
        deleted_at: None,
        reactions: ReactionMap::new(),
    })
}

/// Get a message by id, with reactions
pub async fn get_message(
    pool: &SqlitePool,
    message_id: Uuid,
) -> Result<Option<Message>, sqlx::Error> {
    let row = sqlx::query(&format!(
        "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?"
    ))
    .bind(message_id)
    .fetch_optional(pool)
    .await?;

    let row = match row {
        Some(row) => row,
        None => return Ok(None),
    };

    let reactions = load_reactions(pool, message_id).await?;
    Ok(Some(message_from_row(&row, reactions)))
}

/// List messages in a conversation, newest first, paginated by seq cursor
pub async fn list_messages(
    pool: &SqlitePool,
    conversation_id: Uuid,
    limit: i64,
    before_seq: Option<i64>,
) -> Result<Vec<Message>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {MESSAGE_COLUMNS}
        FROM messages
        WHERE conversation_id = ? AND (? IS NULL OR seq < ?)
        ORDER BY seq DESC
        LIMIT ?
        "#
    ))
    .bind(conversation_id)
    .bind(before_seq)
    .bind(before_seq)
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

/// Apply an edit: new body, `edited_at` stamped, `created_at` untouched
pub async fn edit_message(
    pool: &SqlitePool,
    message_id: Uuid,
    body: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE messages
        SET body = ?, edited_at = ?
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(body)
    .bind(Utc::now())
    .bind(message_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Soft-delete: clear content, keep the row for thread and pin integrity
pub async fn soft_delete_message(
    pool: &SqlitePool,
    message_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE messages
        SET body = NULL, asset_id = NULL, deleted_at = ?
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(Utc::now())
    .bind(message_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Add a reaction; a no-op if the (user, emoji) pair is already present
pub async fn add_reaction(
    pool: &SqlitePool,
    message_id: Uuid,
    user_id: Uuid,
    emoji: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO message_reactions (message_id, user_id, emoji, created_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (message_id, user_id, emoji) DO NOTHING
        "#,
    )
    .bind(message_id)
    .bind(user_id)
    .bind(emoji)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Remove a reaction; a no-op if absent
pub async fn remove_reaction(
    pool: &SqlitePool,
    message_id: Uuid,
    user_id: Uuid,
    emoji: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM message_reactions
        WHERE message_id = ? AND user_id = ? AND emoji = ?
        "#,
    )
    .bind(message_id)
    .bind(user_id)
    .bind(emoji)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Search message bodies across the conversations a user belongs to
///
/// Substring match, newest first, soft-deleted messages excluded. The join
/// on membership is what keeps results scoped to visible conversations.
pub async fn search_messages(
    pool: &SqlitePool,
    user_id: Uuid,
    query: &str,
    conversation_id: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Message>, sqlx::Error> {
    let pattern = format!("%{}%", query.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_"));
    let rows = sqlx::query(
        r#"
        SELECT m.id, m.conversation_id, m.seq, m.author_id, m.body, m.asset_id, m.reply_to_id, m.thread_root_id, m.is_system, m.created_at, m.edited_at, m.deleted_at
        FROM messages m
        INNER JOIN conversation_members cm
            ON cm.conversation_id = m.conversation_id AND cm.user_id = ?
        WHERE m.deleted_at IS NULL
          AND m.body LIKE ? ESCAPE '\'
          AND (? IS NULL OR m.conversation_id = ?)
        ORDER BY m.created_at DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(user_id)
    .bind(pattern)
    .bind(conversation_id)
    .bind(conversation_id)
    .bind(limit)
    .bind(offset)
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
