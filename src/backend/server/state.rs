//! Application State Management
//!
//! This module defines the application state structure and implements the
//! `FromRef` traits for axum state extraction.
//!
//! # Architecture
//!
//! `AppState` is the central state container: it owns the conversation
//! service, which in turn owns the store pool, the fan-out handle, and the
//! optional collaborators. The fan-out handle is injected into the service
//! at construction, never reached through a settable global.
//!
//! # Thread Safety
//!
//! Everything in here is a cheap clonable handle; handlers extract what
//! they need via `FromRef` without taking the whole state.

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::realtime::ConversationFanout;
use crate::backend::service::ConversationService;

/// Application state for the axum router
#[derive(Clone)]
pub struct AppState {
    /// The conversation service; the only entry point handlers use
    pub service: ConversationService,
}

impl AppState {
    pub fn new(service: ConversationService) -> Self {
        Self { service }
    }
}

/// Allow handlers to extract the service directly
impl FromRef<AppState> for ConversationService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.service.clone()
    }
}

/// Allow handlers to extract the fan-out handle directly
impl FromRef<AppState> for ConversationFanout {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.service.fanout().clone()
    }
}

/// Allow handlers to extract the store pool directly
impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.service.pool().clone()
    }
}
