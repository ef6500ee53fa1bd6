//! Pin operations
//!
//! Any member may pin or unpin; pinning is lightweight bookmarking, not a
//! moderation action. Both directions are idempotent.

use uuid::Uuid;

use crate::backend::messages::db as messages_db;
use crate::backend::pins::db;
use crate::shared::messaging::Pin;
use crate::shared::{ConversationEvent, ServiceError};

use super::ConversationService;

impl ConversationService {
    /// Pin a message; returns the updated pin list
    pub async fn pin_message(
        &self,
        conversation_id: Uuid,
        message_id: Uuid,
        requester: Uuid,
    ) -> Result<Vec<Pin>, ServiceError> {
        self.require_member(conversation_id, requester).await?;

        messages_db::get_message(&self.pool, message_id)
            .await?
            .filter(|m| m.conversation_id == conversation_id)
            .ok_or(ServiceError::NotFound)?;

        let changed = db::insert_pin(&self.pool, conversation_id, message_id, requester).await?;
        let pins = db::list_pins(&self.pool, conversation_id).await?;
        if changed > 0 {
            self.publish(ConversationEvent::pin_updated(conversation_id, &pins));
        }
        Ok(pins)
    }

    /// Unpin a message; returns the updated pin list
    pub async fn unpin_message(
        &self,
        conversation_id: Uuid,
        message_id: Uuid,
        requester: Uuid,
    ) -> Result<Vec<Pin>, ServiceError> {
        self.require_member(conversation_id, requester).await?;

        let changed = db::delete_pin(&self.pool, conversation_id, message_id).await?;
        let pins = db::list_pins(&self.pool, conversation_id).await?;
        if changed > 0 {
            self.publish(ConversationEvent::pin_updated(conversation_id, &pins));
        }
        Ok(pins)
    }

    /// List the conversation's pins, newest first, bounded
    pub async fn list_pins(
        &self,
        conversation_id: Uuid,
        requester: Uuid,
    ) -> Result<Vec<Pin>, ServiceError> {
        self.require_member(conversation_id, requester).await?;
        Ok(db::list_pins(&self.pool, conversation_id).await?)
    }
}
