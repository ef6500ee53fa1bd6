//! Activity Log Capability
//!
//! Optional audit sink for message mutations. A failing sink must never
//! block the mutation that triggered it; the service logs the failure and
//! moves on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// One audit record
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub actor_id: Uuid,
    pub action: &'static str,
    pub conversation_id: Uuid,
    pub message_id: Option<Uuid>,
    pub at: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn new(
        actor_id: Uuid,
        action: &'static str,
        conversation_id: Uuid,
        message_id: Option<Uuid>,
    ) -> Self {
        Self {
            actor_id,
            action,
            conversation_id,
            message_id,
            at: Utc::now(),
        }
    }
}

/// Failure writing to the audit sink
#[derive(Debug, Error)]
#[error("activity log write failed: {message}")]
pub struct ActivityLogError {
    pub message: String,
}

/// An audit sink for conversation activity
#[async_trait]
pub trait ActivityLog: Send + Sync {
    async fn record(&self, entry: ActivityEntry) -> Result<(), ActivityLogError>;
}

/// Audit sink that emits structured tracing events
pub struct TracingActivityLog;

#[async_trait]
impl ActivityLog for TracingActivityLog {
    async fn record(&self, entry: ActivityEntry) -> Result<(), ActivityLogError> {
        tracing::info!(
            target: "activity",
            actor = %entry.actor_id,
            action = entry.action,
            conversation = %entry.conversation_id,
            message = ?entry.message_id,
            "activity"
        );
        Ok(())
    }
}
