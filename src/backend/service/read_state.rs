//! Read-state operations: monotonic cursor advancement, per-member read
//! states, and unread counts.

use uuid::Uuid;

use crate::backend::messages::db as messages_db;
use crate::backend::read_state::db;
use crate::shared::messaging::ReadState;
use crate::shared::{ConversationEvent, ServiceError};

use super::ConversationService;

/// Whether a candidate cursor position advances the stored one
///
/// Mirrors the SQL guard in the store; out-of-order calls never move the
/// cursor backward.
pub fn cursor_advances(current: Option<i64>, candidate: i64) -> bool {
    match current {
        None => true,
        Some(current) => candidate > current,
    }
}

impl ConversationService {
    /// Advance the requester's read cursor to a message
    ///
    /// Returns whether the cursor moved; a stale message id (at or behind
    /// the cursor) is reported as `updated: false`, not an error. A moved
    /// cursor fans out a read-receipt event.
    pub async fn mark_read(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
        message_id: Uuid,
    ) -> Result<bool, ServiceError> {
        self.require_member(conversation_id, user_id).await?;

        let message = messages_db::get_message(&self.pool, message_id)
            .await?
            .filter(|m| m.conversation_id == conversation_id)
            .ok_or(ServiceError::NotFound)?;

        let updated = db::advance_cursor(&self.pool, conversation_id, user_id, message.seq).await?;
        if updated == 0 {
            return Ok(false);
        }

        self.publish(ConversationEvent::read_receipt(
            conversation_id,
            user_id,
            message_id,
        ));
        Ok(true)
    }

    /// Read cursors of every member of a conversation
    pub async fn conversation_read_states(
        &self,
        conversation_id: Uuid,
        requester: Uuid,
    ) -> Result<Vec<ReadState>, ServiceError> {
        self.require_member(conversation_id, requester).await?;
        Ok(db::read_states(&self.pool, conversation_id).await?)
    }

    /// Unread count for the requester: messages after their cursor authored
    /// by someone else, excluding soft-deleted ones
    pub async fn unread_count(
        &self,
        conversation_id: Uuid,
        requester: Uuid,
    ) -> Result<i64, ServiceError> {
        self.require_member(conversation_id, requester).await?;
        Ok(db::unread_count(&self.pool, conversation_id, requester).await?)
    }
}
