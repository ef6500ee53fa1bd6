//! Conversation Event System
//!
//! This module defines the typed events fanned out to subscribers of a
//! conversation. Events describe committed mutations: a client that misses
//! one (offline, lagged) reconciles by re-fetching the message list; the
//! store stays the source of truth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::messaging::{Message, Pin};

/// Kind of conversation event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventKind {
    /// A message was created
    #[serde(rename = "message:created")]
    MessageCreated,
    /// A message body was edited
    #[serde(rename = "message:edited")]
    MessageEdited,
    /// A message was soft-deleted
    #[serde(rename = "message:deleted")]
    MessageDeleted,
    /// A member advanced their read cursor
    #[serde(rename = "conversation:read-receipt")]
    ReadReceipt,
    /// A reaction was added or removed
    #[serde(rename = "reaction:updated")]
    ReactionUpdated,
    /// A message was pinned or unpinned
    #[serde(rename = "pin:updated")]
    PinUpdated,
}

impl EventKind {
    /// Wire name of this event kind, also used as the SSE event name
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::MessageCreated => "message:created",
            EventKind::MessageEdited => "message:edited",
            EventKind::MessageDeleted => "message:deleted",
            EventKind::ReadReceipt => "conversation:read-receipt",
            EventKind::ReactionUpdated => "reaction:updated",
            EventKind::PinUpdated => "pin:updated",
        }
    }

    /// Parse a wire name back into a kind (used by subscription filters)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "message:created" => Some(EventKind::MessageCreated),
            "message:edited" => Some(EventKind::MessageEdited),
            "message:deleted" => Some(EventKind::MessageDeleted),
            "conversation:read-receipt" => Some(EventKind::ReadReceipt),
            "reaction:updated" => Some(EventKind::ReactionUpdated),
            "pin:updated" => Some(EventKind::PinUpdated),
            _ => None,
        }
    }
}

/// An event broadcast to the subscribers of one conversation
///
/// Within a conversation channel events are delivered in publish order, which
/// follows store commit order; the message `seq` carried in payloads is the
/// authoritative ordering if a client needs to re-sort.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationEvent {
    /// Conversation this event belongs to
    pub conversation_id: Uuid,
    /// Kind of event
    pub kind: EventKind,
    /// Event payload (JSON-serializable data)
    pub payload: serde_json::Value,
    /// When the event was emitted
    pub emitted_at: DateTime<Utc>,
}

impl ConversationEvent {
    /// Create a new event
    pub fn new(conversation_id: Uuid, kind: EventKind, payload: serde_json::Value) -> Self {
        Self {
            conversation_id,
            kind,
            payload,
            emitted_at: Utc::now(),
        }
    }

    /// Event for a newly created message
    pub fn message_created(message: &Message) -> Self {
        Self::new(
            message.conversation_id,
            EventKind::MessageCreated,
            serde_json::to_value(message).unwrap_or_default(),
        )
    }

    /// Event for an edited message
    pub fn message_edited(message: &Message) -> Self {
        Self::new(
            message.conversation_id,
            EventKind::MessageEdited,
            serde_json::to_value(message).unwrap_or_default(),
        )
    }

    /// Event for a soft-deleted message
    pub fn message_deleted(conversation_id: Uuid, message_id: Uuid, deleted_by: Uuid) -> Self {
        Self::new(
            conversation_id,
            EventKind::MessageDeleted,
            serde_json::json!({
                "message_id": message_id,
                "deleted_by": deleted_by,
            }),
        )
    }

    /// Event for an advanced read cursor
    pub fn read_receipt(conversation_id: Uuid, user_id: Uuid, last_read_message_id: Uuid) -> Self {
        Self::new(
            conversation_id,
            EventKind::ReadReceipt,
            serde_json::json!({
                "user_id": user_id,
                "last_read_message_id": last_read_message_id,
            }),
        )
    }

    /// Event for a changed reaction set
    pub fn reaction_updated(message: &Message) -> Self {
        Self::new(
            message.conversation_id,
            EventKind::ReactionUpdated,
            serde_json::json!({
                "message_id": message.id,
                "reactions": message.reactions,
            }),
        )
    }

    /// Event for a pinned or unpinned message
    pub fn pin_updated(conversation_id: Uuid, pins: &[Pin]) -> Self {
        Self::new(
            conversation_id,
            EventKind::PinUpdated,
            serde_json::json!({ "pins": pins }),
        )
    }
}
