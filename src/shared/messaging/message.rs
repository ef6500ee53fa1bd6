//! Message Data Structures
//!
//! Represents a message in a conversation, including its soft-delete state,
//! reply/thread links, and reaction map.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reaction map: emoji to the users who reacted with it
///
/// A `BTreeMap` keeps serialization order stable across fetches.
pub type ReactionMap = BTreeMap<String, Vec<Uuid>>;

/// Represents a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Unique message ID
    pub id: Uuid,
    /// Conversation this message belongs to
    pub conversation_id: Uuid,
    /// Per-conversation sequence number; the causal order used by read
    /// cursors and pagination
    pub seq: i64,
    /// User who authored the message
    pub author_id: Uuid,
    /// Message text; `None` for attachment-only and deleted messages
    pub body: Option<String>,
    /// Attached asset, resolved by the external asset store
    pub asset_id: Option<String>,
    /// Message this one replies to (weak reference)
    pub reply_to_id: Option<Uuid>,
    /// Root of the thread this message belongs to, if it is a reply
    pub thread_root_id: Option<Uuid>,
    /// Whether this is a system message (e.g. "user joined")
    pub is_system: bool,
    /// When the message was sent
    pub created_at: DateTime<Utc>,
    /// When the message was last edited, if ever
    pub edited_at: Option<DateTime<Utc>>,
    /// When the message was soft-deleted, if deleted
    pub deleted_at: Option<DateTime<Utc>>,
    /// Reactions on this message
    #[serde(default)]
    pub reactions: ReactionMap,
}

impl Message {
    /// Check if the message is soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Check if the message has been edited
    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }

    /// Check if the message is a reply
    pub fn is_reply(&self) -> bool {
        self.reply_to_id.is_some()
    }

    /// Get a preview of the message body (first `max_len` characters)
    pub fn preview(&self, max_len: usize) -> String {
        let body = match &self.body {
            Some(body) => body,
            None if self.is_deleted() => return String::from("(deleted)"),
            None => return String::from("(attachment)"),
        };
        if body.chars().count() <= max_len {
            body.clone()
        } else {
            let mut preview: String = body.chars().take(max_len.saturating_sub(3)).collect();
            preview.push_str("...");
            preview
        }
    }
}

/// Request to send a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub body: Option<String>,
    pub asset_id: Option<String>,
    pub reply_to_id: Option<Uuid>,
}

/// Request to edit a message body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditMessageRequest {
    pub body: String,
}

/// Request to add or remove a reaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionRequest {
    pub emoji: String,
}

/// Query parameters for listing messages, newest first
///
/// `before` is the `seq` cursor of the oldest message the client already
/// holds; the cursor is stateless, so listing can restart anywhere.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMessagesParams {
    pub limit: Option<u32>,
    pub before: Option<i64>,
}

/// Response for listing messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMessagesResponse {
    pub messages: Vec<Message>,
    pub has_more: bool,
}

/// Query parameters for searching messages
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchMessagesParams {
    pub query: String,
    pub conversation_id: Option<Uuid>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Request to mark a conversation read up to a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkReadRequest {
    pub last_read_message_id: Uuid,
}

/// Result of a mark-read call; `updated` is false when the cursor did not
/// move (monotonicity rejected an older message id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkReadResponse {
    pub updated: bool,
}

/// A pinned message reference
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pin {
    pub conversation_id: Uuid,
    pub message_id: Uuid,
    pub pinned_by: Uuid,
    pub pinned_at: DateTime<Utc>,
}

/// A member's read cursor, as reported to other members
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadState {
    pub user_id: Uuid,
    pub last_read_message_id: Option<Uuid>,
    pub last_read_at: Option<DateTime<Utc>>,
}
