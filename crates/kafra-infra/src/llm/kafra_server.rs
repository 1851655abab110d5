//! HTTP client for the Kafra chat server.
//!
//! Posts the conversation to `{base_url}/api/kafra-chat` and reads back the
//! `{ reply, timestamp, model }` body. The server holds the upstream API key
//! and the persona prompt, so this backend sends neither.

use std::time::Duration;

use kafra_core::llm::provider::LlmProvider;
use kafra_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};
use kafra_types::wire::{ErrorBody, KafraChatReply, KafraChatRequest, WireMessage};

/// Path of the chat endpoint, relative to the server base URL.
pub const CHAT_PATH: &str = "/api/kafra-chat";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Primary backend: the Kafra chat server.
#[derive(Debug, Clone)]
pub struct KafraServerBackend {
    client: reqwest::Client,
    base_url: String,
}

impl KafraServerBackend {
    /// Create a backend for the server at `base_url` (e.g. `http://127.0.0.1:3001`).
    pub fn new(base_url: &str) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self) -> String {
        format!("{}{CHAT_PATH}", self.base_url)
    }
}

impl LlmProvider for KafraServerBackend {
    fn name(&self) -> &str {
        "kafra_server"
    }

    fn model(&self) -> &str {
        "server-default"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = KafraChatRequest {
            messages: request
                .messages
                .iter()
                .filter_map(WireMessage::from_message)
                .collect(),
        };

        let response = self
            .client
            .post(self.url())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or(text);
            return Err(match status.as_u16() {
                400 => LlmError::InvalidRequest(message),
                402 => LlmError::QuotaExceeded(message),
                429 => LlmError::RateLimited {
                    retry_after_ms: None,
                },
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {message}"),
                },
            });
        }

        let reply: KafraChatReply = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let content = reply.reply.trim();
        if content.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(CompletionResponse {
            id: format!("kafra-{}", reply.timestamp),
            content: content.to_string(),
            model: reply.model,
            usage: Usage::default(),
        })
    }
}
