//! Database operations for conversations and membership
//!
//! This module contains the conversation store: conversation rows, member
//! rows, and the queries behind the user's conversation list.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::shared::messaging::{Conversation, Member, MemberRole};

fn member_from_row(row: &sqlx::sqlite::SqliteRow) -> Member {
    Member {
        conversation_id: row.get("conversation_id"),
        user_id: row.get("user_id"),
        role: MemberRole::parse(row.get::<String, _>("role").as_str()),
        joined_at: row.get("joined_at"),
        last_read_seq: row.get("last_read_seq"),
        last_read_at: row.get("last_read_at"),
        muted_at: row.get("muted_at"),
    }
}

fn conversation_from_row(row: &sqlx::sqlite::SqliteRow, members: Vec<Member>) -> Conversation {
    Conversation {
        id: row.get("id"),
        organization_id: row.get("organization_id"),
        project_id: row.get("project_id"),
        name: row.get("name"),
        is_group: row.get("is_group"),
        created_by: row.get("created_by"),
        created_at: row.get("created_at"),
        last_activity_at: row.get("last_activity_at"),
        members,
    }
}

/// Create a conversation and its initial member rows in one transaction
#[allow(clippy::too_many_arguments)]
pub async fn create_conversation(
    pool: &SqlitePool,
    id: Uuid,
    organization_id: Option<Uuid>,
    project_id: Option<Uuid>,
    name: Option<&str>,
    is_group: bool,
    created_by: Uuid,
    members: &[(Uuid, MemberRole)],
) -> Result<DateTime<Utc>, sqlx::Error> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO conversations (id, organization_id, project_id, name, is_group, created_by, created_at, last_activity_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(organization_id)
    .bind(project_id)
    .bind(name)
    .bind(is_group)
    .bind(created_by)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for (user_id, role) in members {
        sqlx::query(
            r#"
            INSERT INTO conversation_members (conversation_id, user_id, role, joined_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(role.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(now)
}

/// Get a conversation with its members
pub async fn get_conversation(
    pool: &SqlitePool,
    conversation_id: Uuid,
) -> Result<Option<Conversation>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, organization_id, project_id, name, is_group, created_by, created_at, last_activity_at
        FROM conversations
        WHERE id = ?
        "#,
    )
    .bind(conversation_id)
    .fetch_optional(pool)
    .await?;

    let row = match row {
        Some(row) => row,
        None => return Ok(None),
    };

    let members = list_members(pool, conversation_id).await?;
    Ok(Some(conversation_from_row(&row, members)))
}

/// List all members of a conversation
pub async fn list_members(
    pool: &SqlitePool,
    conversation_id: Uuid,
) -> Result<Vec<Member>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT conversation_id, user_id, role, joined_at, last_read_seq, last_read_at, muted_at
        FROM conversation_members
        WHERE conversation_id = ?
        ORDER BY joined_at ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(member_from_row).collect())
}

/// Get a single membership record
pub async fn get_member(
    pool: &SqlitePool,
    conversation_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Member>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT conversation_id, user_id, role, joined_at, last_read_seq, last_read_at, muted_at
        FROM conversation_members
        WHERE conversation_id = ? AND user_id = ?
        "#,
    )
    .bind(conversation_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| member_from_row(&r)))
}

/// Update the mutable conversation fields (name, is_group)
pub async fn update_conversation(
    pool: &SqlitePool,
    conversation_id: Uuid,
    name: Option<&str>,
    is_group: Option<bool>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE conversations
        SET name = COALESCE(?, name), is_group = COALESCE(?, is_group)
        WHERE id = ?
        "#,
    )
    .bind(name)
    .bind(is_group)
    .bind(conversation_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Add a member; a no-op returning `None` if already present
pub async fn insert_member(
    pool: &SqlitePool,
    conversation_id: Uuid,
    user_id: Uuid,
    role: MemberRole,
) -> Result<Option<Member>, sqlx::Error> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO conversation_members (conversation_id, user_id, role, joined_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (conversation_id, user_id) DO NOTHING
        "#,
    )
    .bind(conversation_id)
    .bind(user_id)
    .bind(role.as_str())
    .bind(now)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    Ok(Some(Member {
        conversation_id,
        user_id,
        role,
        joined_at: now,
        last_read_seq: None,
        last_read_at: None,
        muted_at: None,
    }))
}

/// Remove a member; returns 0 if the member was already absent
pub async fn delete_member(
    pool: &SqlitePool,
    conversation_id: Uuid,
    user_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM conversation_members
        WHERE conversation_id = ? AND user_id = ?
        "#,
    )
    .bind(conversation_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Count the admins of a conversation
pub async fn count_admins(
    pool: &SqlitePool,
    conversation_id: Uuid,
) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) as count
        FROM conversation_members
        WHERE conversation_id = ? AND role = 'admin'
        "#,
    )
    .bind(conversation_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get("count"))
}

/// Set or clear a member's mute timestamp
pub async fn set_muted(
    pool: &SqlitePool,
    conversation_id: Uuid,
    user_id: Uuid,
    muted: bool,
) -> Result<u64, sqlx::Error> {
    let muted_at = muted.then(Utc::now);
    let result = sqlx::query(
        r#"
        UPDATE conversation_members
        SET muted_at = ?
        WHERE conversation_id = ? AND user_id = ?
        "#,
    )
    .bind(muted_at)
    .bind(conversation_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// List a user's conversations, most recently active first
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
    project_id: Option<Uuid>,
) -> Result<Vec<Conversation>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT c.id, c.organization_id, c.project_id, c.name, c.is_group, c.created_by, c.created_at, c.last_activity_at
        FROM conversations c
        INNER JOIN conversation_members cm ON c.id = cm.conversation_id
        WHERE cm.user_id = ? AND (? IS NULL OR c.project_id = ?)
        ORDER BY c.last_activity_at DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(user_id)
    .bind(project_id)
    .bind(project_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let mut conversations = Vec::with_capacity(rows.len());
    for row in rows {
        let id: Uuid = row.get("id");
        let members = list_members(pool, id).await?;
        conversations.push(conversation_from_row(&row, members));
    }

    Ok(conversations)
}
