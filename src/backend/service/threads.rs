//! Thread operations: reply listings and summaries, computed from the
//! canonical message list.

use uuid::Uuid;

use crate::backend::threads::db;
use crate::shared::messaging::{ThreadSummary, ThreadView};
use crate::shared::ServiceError;

use super::conversations::clamp_limit;
use super::ConversationService;

const DEFAULT_THREAD_LIMIT: u32 = 100;
const MAX_THREAD_LIMIT: u32 = 500;

impl ConversationService {
    /// List a thread: the root (even if soft-deleted) plus its live replies,
    /// oldest first
    pub async fn thread_messages(
        &self,
        conversation_id: Uuid,
        root_id: Uuid,
        requester: Uuid,
        limit: Option<u32>,
    ) -> Result<ThreadView, ServiceError> {
        self.require_member(conversation_id, requester).await?;

        let root = db::get_root(&self.pool, conversation_id, root_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let limit = clamp_limit(limit, DEFAULT_THREAD_LIMIT, MAX_THREAD_LIMIT);
        let messages = db::list_replies(&self.pool, root_id, limit).await?;
        let reply_count = db::reply_count(&self.pool, root_id).await?;

        Ok(ThreadView {
            root,
            messages,
            reply_count,
        })
    }

    /// Lightweight thread summary
    pub async fn thread_summary(
        &self,
        conversation_id: Uuid,
        root_id: Uuid,
        requester: Uuid,
    ) -> Result<ThreadSummary, ServiceError> {
        self.require_member(conversation_id, requester).await?;

        db::get_root(&self.pool, conversation_id, root_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        Ok(db::thread_summary(&self.pool, root_id).await?)
    }
}
