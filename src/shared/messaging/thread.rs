//! Thread View Structures
//!
//! A thread is not a stored aggregate: it is the set of messages whose
//! `thread_root_id` points at a root message, recomputed from the canonical
//! message list on every read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::Message;

/// A thread root with its ordered replies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThreadView {
    /// The root message; still present (marked deleted) if soft-deleted
    pub root: Message,
    /// Replies, oldest first; soft-deleted replies are excluded
    pub messages: Vec<Message>,
    /// Count of live (non-deleted) replies
    pub reply_count: i64,
}

/// Lightweight summary of a thread
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThreadSummary {
    /// Count of live (non-deleted) replies
    pub reply_count: i64,
    /// When the latest live reply was created
    pub last_reply_at: Option<DateTime<Utc>>,
    /// Authors of live replies
    pub participant_ids: Vec<Uuid>,
}

/// Query parameters for listing thread messages
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListThreadParams {
    pub limit: Option<u32>,
}
