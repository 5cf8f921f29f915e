//! Writing suggestions produced by an external completion service.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::error::DomainError;
use crate::domain::suggestions::{Draft, ParsedSuggestions, parse_reply};

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion API key is not configured")]
    MissingApiKey,
    #[error("completion request failed: {0}")]
    Transport(String),
    #[error("completion service responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("completion response could not be decoded: {0}")]
    Decode(String),
}

/// Port for a single prompt-to-text call.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the reply text for `prompt`.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

#[derive(Debug, Clone, Default)]
pub struct SuggestionCommand {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Clone)]
pub struct SuggestionService {
    client: Arc<dyn CompletionClient>,
}

impl SuggestionService {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Rejects an empty draft before any outbound call is made.
    pub async fn suggest(&self, command: SuggestionCommand) -> Result<Vec<String>, SuggestionError> {
        let draft = Draft::new(command.title, command.content)?;
        let reply = self.client.complete(&draft.prompt()).await?;

        let parsed = parse_reply(&reply);
        match &parsed {
            ParsedSuggestions::Strict(items) => info!(
                target = "blogify::application::suggestions::suggest",
                count = items.len(),
                "suggestions parsed"
            ),
            ParsedSuggestions::Fallback(items) => warn!(
                target = "blogify::application::suggestions::suggest",
                count = items.len(),
                reply_len = reply.len(),
                "completion reply was not JSON; using line fallback"
            ),
        }

        Ok(parsed.into_vec())
    }
}
