//! Conversation Service
//!
//! The orchestration layer behind every external operation. Handlers call
//! only this type; it composes the stores, enforces visibility and
//! permission rules, and publishes fan-out events after mutations commit.
//!
//! # Construction
//!
//! The fan-out handle and the optional collaborators are injected at
//! construction time. There is no settable global: anything the service
//! needs, it owns.
//!
//! # Visibility
//!
//! Every operation begins by resolving the caller's membership. A missing
//! conversation and a conversation the caller is not a member of produce the
//! same opaque `NotFound`, so membership cannot be probed from outside.

pub mod conversations;
pub mod messages;
pub mod pins;
pub mod rate_limit;
pub mod read_state;
pub mod summary;
pub mod threads;

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::backend::capabilities::{ActivityEntry, ActivityLog, Summarizer};
use crate::backend::conversations::db as conversations_db;
use crate::backend::realtime::broadcast::ConversationFanout;
use crate::shared::messaging::Member;
use crate::shared::{ConversationEvent, ServiceError};

use rate_limit::SearchLimiter;

/// The conversation service
///
/// Cheap to clone; all fields are handles.
#[derive(Clone)]
pub struct ConversationService {
    pool: SqlitePool,
    fanout: ConversationFanout,
    summarizer: Option<Arc<dyn Summarizer>>,
    activity: Option<Arc<dyn ActivityLog>>,
    search_limiter: SearchLimiter,
}

impl ConversationService {
    pub fn new(pool: SqlitePool, fanout: ConversationFanout) -> Self {
        Self {
            pool,
            fanout,
            summarizer: None,
            activity: None,
            search_limiter: SearchLimiter::default(),
        }
    }

    /// Attach the optional summary collaborator
    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// Attach the optional activity-log collaborator
    pub fn with_activity_log(mut self, activity: Arc<dyn ActivityLog>) -> Self {
        self.activity = Some(activity);
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn fanout(&self) -> &ConversationFanout {
        &self.fanout
    }

    /// Subscribe to a conversation's live events
    ///
    /// Membership-gated like every read: non-members get `NotFound`.
    pub async fn subscribe(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<broadcast::Receiver<ConversationEvent>, ServiceError> {
        self.require_member(conversation_id, user_id).await?;
        Ok(self.fanout.subscribe(conversation_id))
    }

    /// Resolve the caller's membership, hiding existence from non-members
    pub(crate) async fn require_member(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<Member, ServiceError> {
        conversations_db::get_member(&self.pool, conversation_id, user_id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    /// Record an audit entry; sink failures are logged, never propagated
    pub(crate) async fn log_activity(&self, entry: ActivityEntry) {
        if let Some(activity) = &self.activity {
            if let Err(e) = activity.record(entry).await {
                tracing::warn!("[Service] activity log write failed: {}", e);
            }
        }
    }

    /// Publish a committed mutation to the conversation's subscribers
    pub(crate) fn publish(&self, event: ConversationEvent) {
        self.fanout.publish(event);
    }
}
