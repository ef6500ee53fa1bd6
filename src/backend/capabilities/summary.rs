//! Conversation Summary Capability
//!
//! The summary service is an optional collaborator. When its endpoint is not
//! configured the capability is simply absent (`None` at the service level)
//! and summary requests report unavailability instead of failing; when it is
//! configured but unreachable, callers get `UpstreamUnavailable`.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::shared::messaging::Message;

/// Failure talking to the summary collaborator
#[derive(Debug, Error)]
pub enum SummarizerError {
    #[error("summary request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("summary response missing summary text")]
    MalformedResponse,
}

/// A collaborator that can summarize a slice of conversation history
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        conversation_id: Uuid,
        messages: &[Message],
    ) -> Result<String, SummarizerError>;
}

/// HTTP-backed summarizer
///
/// Posts the message slice as JSON and expects `{"summary": "..."}` back.
pub struct HttpSummarizer {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct SummaryResponse {
    summary: Option<String>,
}

impl HttpSummarizer {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl Summarizer for HttpSummarizer {
    async fn summarize(
        &self,
        conversation_id: Uuid,
        messages: &[Message],
    ) -> Result<String, SummarizerError> {
        let payload = serde_json::json!({
            "conversation_id": conversation_id,
            "messages": messages
                .iter()
                .map(|m| serde_json::json!({
                    "author_id": m.author_id,
                    "body": m.body,
                    "created_at": m.created_at,
                }))
                .collect::<Vec<_>>(),
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json::<SummaryResponse>()
            .await?;

        response.summary.ok_or(SummarizerError::MalformedResponse)
    }
}
