//! Router Configuration
//!
//! This module provides the main router creation function that combines all
//! route configurations into a single axum router.
//!
//! # Route Groups
//!
//! - Conversations: create/list/get/update, membership, mute, summary
//! - Messages: send/list/edit/delete, reactions, search
//! - Read state: mark-read, per-member read states
//! - Threads: thread listing and summaries
//! - Pins: pin/unpin/list
//! - Realtime: per-conversation SSE event stream

use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::backend::conversations::handlers as conversations;
use crate::backend::messages::handlers as messages;
use crate::backend::pins::handlers as pins;
use crate::backend::read_state::handlers as read_state;
use crate::backend::realtime::subscription::subscribe_conversation;
use crate::backend::server::state::AppState;
use crate::backend::threads::handlers as threads;

/// Liveness probe
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Create the axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new()
        .route("/health", get(health))
        .route(
            "/api/conversations",
            post(conversations::create_conversation).get(conversations::list_conversations),
        )
        .route(
            "/api/conversations/{id}",
            get(conversations::get_conversation).patch(conversations::update_conversation),
        )
        .route(
            "/api/conversations/{id}/members",
            post(conversations::add_member),
        )
        .route(
            "/api/conversations/{id}/members/{user_id}",
            delete(conversations::remove_member),
        )
        .route(
            "/api/conversations/{id}/mute",
            post(conversations::set_muted),
        )
        .route(
            "/api/conversations/{id}/summary",
            get(conversations::summarize_conversation),
        )
        .route(
            "/api/conversations/{id}/messages",
            post(messages::send_message).get(messages::list_messages),
        )
        .route(
            "/api/conversations/{id}/events",
            get(subscribe_conversation),
        )
        .route("/api/conversations/{id}/read", post(read_state::mark_read))
        .route(
            "/api/conversations/{id}/read-states",
            get(read_state::read_states),
        )
        .route("/api/conversations/{id}/pins", get(pins::list_pins))
        .route(
            "/api/conversations/{id}/pins/{message_id}",
            put(pins::pin_message).delete(pins::unpin_message),
        )
        .route(
            "/api/conversations/{id}/threads/{root_id}",
            get(threads::thread_messages),
        )
        .route(
            "/api/conversations/{id}/threads/{root_id}/summary",
            get(threads::thread_summary),
        )
        .route("/api/messages/search", get(messages::search_messages))
        .route(
            "/api/messages/{id}",
            patch(messages::edit_message).delete(messages::delete_message),
        )
        .route(
            "/api/messages/{id}/reactions",
            post(messages::add_reaction).delete(messages::remove_reaction),
        );

    router
        .fallback(|| async { "404 Not Found" })
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
