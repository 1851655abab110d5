//! LLM request/response types for Kafra.
//!
//! These types model the data shapes for LLM provider interactions:
//! completion requests, responses, and error handling. Both the upstream
//! OpenAI-compatible providers and the Kafra chat server backend speak them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Role of a message in an LLM conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message in an LLM conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request to an LLM provider for a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model override; empty means "use the provider's configured model".
    #[serde(default)]
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl CompletionRequest {
    /// Build a request that uses the provider's default model.
    pub fn from_messages(messages: Vec<Message>, max_tokens: u32) -> Self {
        Self {
            model: String::new(),
            messages,
            system: None,
            max_tokens,
            temperature: None,
        }
    }

    /// Content of the most recent user message, if any.
    pub fn last_user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
    }
}

/// Response from an LLM provider for a non-streaming completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub content: String,
    pub model: String,
    #[serde(default)]
    pub usage: Usage,
}

/// Token usage for a completion request/response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Errors from LLM provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("provider returned an empty response")]
    EmptyResponse,

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Type of remote chat backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    /// The Kafra chat server (`POST /api/kafra-chat`).
    KafraServer,
    /// OpenAI chat completions.
    #[serde(rename = "openai")]
    OpenAi,
    /// Google Gemini through its OpenAI-compatible endpoint.
    Gemini,
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderType::KafraServer => write!(f, "kafra_server"),
            ProviderType::OpenAi => write!(f, "openai"),
            ProviderType::Gemini => write!(f, "gemini"),
        }
    }
}

impl FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kafra_server" => Ok(ProviderType::KafraServer),
            "openai" => Ok(ProviderType::OpenAi),
            "gemini" => Ok(ProviderType::Gemini),
            other => Err(format!("invalid provider type: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_serde() {
        let role = MessageRole::Assistant;
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: MessageRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MessageRole::Assistant);
    }

    #[test]
    fn test_message_role_parse_is_case_insensitive() {
        assert_eq!("USER".parse::<MessageRole>().unwrap(), MessageRole::User);
        assert!("bot".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_last_user_content() {
        let request = CompletionRequest::from_messages(
            vec![
                Message::user("first"),
                Message::assistant("reply"),
                Message::user("second"),
                Message::assistant("another"),
            ],
            256,
        );
        assert_eq!(request.last_user_content(), Some("second"));

        let empty = CompletionRequest::from_messages(vec![], 256);
        assert_eq!(empty.last_user_content(), None);
    }

    #[test]
    fn test_completion_request_skips_empty_optionals() {
        let request = CompletionRequest::from_messages(vec![Message::user("hi")], 128);
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("system").is_none());
        assert!(json.get("temperature").is_none());
        assert_eq!(json["max_tokens"], 128);
    }

    #[test]
    fn test_llm_error_display() {
        assert_eq!(
            LlmError::Timeout(Duration::from_secs(30)).to_string(),
            "request timed out after 30s"
        );
        assert_eq!(
            LlmError::Timeout(Duration::from_millis(250)).to_string(),
            "request timed out after 250ms"
        );
        assert!(
            LlmError::QuotaExceeded("insufficient_quota".to_string())
                .to_string()
                .contains("insufficient_quota")
        );
    }

    #[test]
    fn test_provider_type_serde() {
        let json = serde_json::to_string(&ProviderType::OpenAi).unwrap();
        assert_eq!(json, "\"openai\"");
        let parsed: ProviderType = serde_json::from_str("\"kafra_server\"").unwrap();
        assert_eq!(parsed, ProviderType::KafraServer);
        assert_eq!(ProviderType::Gemini.to_string(), "gemini");
    }
}
