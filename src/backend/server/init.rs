//! Server Initialization
//!
//! Builds the application from configuration: database pool, fan-out,
//! optional collaborators, service, and finally the router.

use std::sync::Arc;

use axum::Router;

use crate::backend::capabilities::{HttpSummarizer, TracingActivityLog};
use crate::backend::realtime::ConversationFanout;
use crate::backend::routes::create_router;
use crate::backend::service::ConversationService;

use super::config::{connect_database, ServerConfig};
use super::state::AppState;

/// Create the axum application
///
/// Optional collaborators degrade to absent instead of failing startup;
/// the store does not.
pub async fn create_app(config: &ServerConfig) -> Result<Router<()>, sqlx::Error> {
    let pool = connect_database(&config.database_url).await?;
    let fanout = ConversationFanout::default();

    let mut service = ConversationService::new(pool, fanout);

    match &config.summary_service_url {
        Some(url) => {
            tracing::info!("Summary collaborator configured at {}", url);
            service = service.with_summarizer(Arc::new(HttpSummarizer::new(url.clone())));
        }
        None => {
            tracing::info!("No summary collaborator configured; summaries report unavailable");
        }
    }

    if config.activity_log {
        service = service.with_activity_log(Arc::new(TracingActivityLog));
    }

    Ok(create_router(AppState::new(service)))
}
