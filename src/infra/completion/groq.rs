//! Reqwest-backed Groq completion adapter.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::debug;

use super::dto::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat};
use crate::application::suggestions::{CompletionClient, CompletionError};
use crate::config::GroqSettings;
use crate::infra::error::InfraError;

const TEMPERATURE: f32 = 0.8;
const MAX_TOKENS: u32 = 600;
const EMPTY_REPLY: &str = "{}";
const KEY_PREFIX: &str = "gsk_";
const PLACEHOLDER_MARKER: &str = "Your Groq API Key";
const BODY_PREVIEW_CHARS: usize = 160;

pub struct GroqCompletionClient {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    model: String,
}

impl GroqCompletionClient {
    pub fn new(settings: &GroqSettings) -> Result<Self, InfraError> {
        let endpoint = chat_completions_endpoint(&settings.base_url)?;
        let client = Client::builder()
            .user_agent(concat!("blogify/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| InfraError::completion(err.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for GroqCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingApiKey)?;

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| CompletionError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| CompletionError::Transport(err.to_string()))?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let decoded: ChatCompletionResponse = serde_json::from_slice(body.as_ref())
            .map_err(|err| CompletionError::Decode(err.to_string()))?;

        debug!(
            target = "blogify::infra::completion::groq",
            model = %self.model,
            bytes = body.len(),
            "completion received"
        );

        Ok(decoded
            .into_first_content()
            .unwrap_or_else(|| EMPTY_REPLY.to_string()))
    }
}

/// What can be said about the configured key without revealing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroqKeyDiagnostics {
    pub is_set: bool,
    pub starts_with_gsk: bool,
    pub length: usize,
    pub is_placeholder: bool,
}

impl GroqKeyDiagnostics {
    pub fn inspect(api_key: Option<&str>) -> Self {
        match api_key {
            Some(key) => Self {
                is_set: true,
                starts_with_gsk: key.starts_with(KEY_PREFIX),
                length: key.chars().count(),
                is_placeholder: key.contains(PLACEHOLDER_MARKER),
            },
            None => Self {
                is_set: false,
                starts_with_gsk: false,
                length: 0,
                is_placeholder: false,
            },
        }
    }
}

fn chat_completions_endpoint(base_url: &Url) -> Result<Url, InfraError> {
    let joined = format!("{}/chat/completions", base_url.as_str().trim_end_matches('/'));
    Url::parse(&joined).map_err(|err| {
        InfraError::completion(format!("invalid completions endpoint `{joined}`: {err}"))
    })
}

fn map_status_error(status: StatusCode, body: &[u8]) -> CompletionError {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let mut preview = compact.chars().take(BODY_PREVIEW_CHARS).collect::<String>();
    if compact.chars().count() > BODY_PREVIEW_CHARS {
        preview.push_str("...");
    }

    CompletionError::Status {
        status: status.as_u16(),
        body: preview,
    }
}
