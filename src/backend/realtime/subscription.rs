//! Real-time Subscription Handler
//!
//! Server-Sent Events stream for one conversation's live events. SSE keeps
//! the delivery model honest: one-way, best-effort, at-most-once per
//! connected session. A client that reconnects reconciles by re-fetching
//! the message list.
//!
//! # Event Filtering
//!
//! Clients can filter events by kind with the `kinds` query parameter:
//! - `?kinds=message:created,reaction:updated`
//! - No parameter subscribes to every kind.
//!
//! # Connection Management
//!
//! - Connections are kept alive by the SSE keep-alive mechanism.
//! - A lagged subscriber skips the missed events and keeps receiving; the
//!   stream never drops the connection over lag.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::identity::RequesterId;
use crate::backend::service::ConversationService;
use crate::shared::EventKind;

/// Handle a conversation event subscription
/// (GET /api/conversations/{id}/events)
///
/// Membership is checked before subscribing; non-members get the same
/// `NotFound` a nonexistent conversation produces.
pub async fn subscribe_conversation(
    State(service): State<ConversationService>,
    RequesterId(user_id): RequesterId,
    Path(conversation_id): Path<Uuid>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let receiver = service.subscribe(conversation_id, user_id).await?;

    let kinds_filter: Option<Vec<EventKind>> = query
        .get("kinds")
        .map(|raw| raw.split(',').filter_map(|s| EventKind::parse(s.trim())).collect())
        .filter(|kinds: &Vec<_>| !kinds.is_empty());

    if let Some(ref kinds) = kinds_filter {
        tracing::debug!("[Realtime] subscription to {} filtered to {:?}", conversation_id, kinds);
    } else {
        tracing::debug!("[Realtime] subscription to {} for all event kinds", conversation_id);
    }

    // Loop until an event passes the filter; axum's keep-alive injects
    // comment lines, so the stream only ever yields real events.
    let stream = stream::unfold(
        (receiver, kinds_filter),
        move |(mut rx, filter)| async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        if let Some(ref kinds) = filter {
                            if !kinds.contains(&event.kind) {
                                continue;
                            }
                        }

                        let data = match serde_json::to_string(&event) {
                            Ok(data) => data,
                            Err(e) => {
                                tracing::error!("[Realtime] failed to serialize event: {:?}", e);
                                continue;
                            }
                        };

                        let sse_event = Event::default().event(event.kind.as_str()).data(data);
                        return Some((Ok(sse_event), (rx, filter)));
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("[Realtime] receiver lagged, skipped {} events", skipped);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!("[Realtime] channel closed, ending stream");
                        return None;
                    }
                }
            }
        },
    );

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
