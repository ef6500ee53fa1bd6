//! Conversation summary operation
//!
//! Degrades gracefully: with no summarizer configured the result says so; a
//! configured but failing summarizer surfaces `UpstreamUnavailable`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::messages::db as messages_db;
use crate::shared::ServiceError;

use super::ConversationService;

const SUMMARY_MESSAGE_LIMIT: i64 = 100;

/// Result of a summary request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Whether the summary capability is configured
    pub available: bool,
    pub summary: Option<String>,
}

impl ConversationService {
    /// Summarize recent conversation history
    pub async fn summarize_conversation(
        &self,
        conversation_id: Uuid,
        requester: Uuid,
    ) -> Result<ConversationSummary, ServiceError> {
        self.require_member(conversation_id, requester).await?;

        let Some(summarizer) = &self.summarizer else {
            return Ok(ConversationSummary {
                available: false,
                summary: None,
            });
        };

        let mut messages =
            messages_db::list_messages(&self.pool, conversation_id, SUMMARY_MESSAGE_LIMIT, None)
                .await?;
        messages.retain(|m| !m.is_deleted());
        messages.reverse(); // oldest first for the collaborator

        let summary = summarizer
            .summarize(conversation_id, &messages)
            .await
            .map_err(|e| {
                tracing::warn!("[Service] summary collaborator failed: {}", e);
                ServiceError::upstream("summary")
            })?;

        Ok(ConversationSummary {
            available: true,
            summary: Some(summary),
        })
    }
}
