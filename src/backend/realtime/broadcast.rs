//! Real-time Event Fan-out
//!
//! This module provides the per-conversation broadcast channels that deliver
//! committed mutations to connected subscribers.
//!
//! # Broadcasting
//!
//! Events are broadcast using `tokio::sync::broadcast`, one channel per
//! conversation so there is no cross-talk between conversations. All
//! subscribers of a conversation receive a copy of each event, in the order
//! events were published.
//!
//! # Delivery Guarantees
//!
//! Delivery is best-effort and at-most-once per connected session. A client
//! that is offline misses live events and reconciles by re-fetching the
//! message list; a lagged subscriber skips ahead. The message store is the
//! durable source of truth, the fan-out is purely a latency optimization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::shared::ConversationEvent;

/// Default per-conversation channel capacity
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Fan-out state for conversation events
///
/// Manages per-conversation broadcast channels. It can be cloned and shared
/// across handlers; the channel map is behind a mutex, the channels
/// themselves are lock-free.
#[derive(Clone)]
pub struct ConversationFanout {
    channels: Arc<Mutex<HashMap<Uuid, broadcast::Sender<ConversationEvent>>>>,
    capacity: usize,
}

impl ConversationFanout {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
            capacity,
        }
    }

    /// Get or create the broadcast sender for a conversation
    fn sender(&self, conversation_id: Uuid) -> broadcast::Sender<ConversationEvent> {
        let mut channels = self.channels.lock().expect("fanout lock poisoned");
        channels
            .entry(conversation_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }

    /// Subscribe to a conversation's event stream
    pub fn subscribe(&self, conversation_id: Uuid) -> broadcast::Receiver<ConversationEvent> {
        self.sender(conversation_id).subscribe()
    }

    /// Publish an event to all subscribers of its conversation
    ///
    /// Returns the number of active subscribers that received the event
    /// (0 if nobody is listening, which is not an error).
    pub fn publish(&self, event: ConversationEvent) -> usize {
        let sender = {
            let channels = self.channels.lock().expect("fanout lock poisoned");
            channels.get(&event.conversation_id).cloned()
        };

        let Some(sender) = sender else {
            tracing::debug!(
                "[Fanout] No channel for conversation {}, dropping {}",
                event.conversation_id,
                event.kind.as_str()
            );
            return 0;
        };

        match sender.send(event) {
            Ok(subscriber_count) => {
                tracing::debug!("[Fanout] Event delivered to {} subscribers", subscriber_count);
                subscriber_count
            }
            Err(_) => {
                // No subscribers, that's okay
                tracing::debug!("[Fanout] No subscribers to receive event");
                0
            }
        }
    }

    /// Drop channels that no longer have subscribers
    pub fn cleanup_inactive_channels(&self) {
        self.channels
            .lock()
            .expect("fanout lock poisoned")
            .retain(|_, sender| sender.receiver_count() > 0);
    }

    /// Subscriber count for a conversation
    pub fn subscriber_count(&self, conversation_id: Uuid) -> usize {
        self.channels
            .lock()
            .expect("fanout lock poisoned")
            .get(&conversation_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for ConversationFanout {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}
