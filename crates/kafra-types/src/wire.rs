//! JSON wire format for the Kafra chat HTTP API.
//!
//! Shared by the axum server (`kafra-api`) and the HTTP client backend
//! (`kafra-infra`) so both ends agree on field names.

use serde::{Deserialize, Serialize};

use crate::llm::{Message, MessageRole};

/// Body of `POST /api/kafra-chat`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KafraChatRequest {
    #[serde(default)]
    pub messages: Vec<WireMessage>,
}

/// One conversation turn on the wire. Only `user` and `assistant` roles are
/// accepted; the server owns the system prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: WireRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    User,
    Assistant,
}

impl From<WireMessage> for Message {
    fn from(msg: WireMessage) -> Self {
        let role = match msg.role {
            WireRole::User => MessageRole::User,
            WireRole::Assistant => MessageRole::Assistant,
        };
        Message {
            role,
            content: msg.content,
        }
    }
}

impl WireMessage {
    /// Convert an LLM message for transport. System messages have no wire
    /// representation and yield `None`.
    pub fn from_message(msg: &Message) -> Option<Self> {
        let role = match msg.role {
            MessageRole::User => WireRole::User,
            MessageRole::Assistant => WireRole::Assistant,
            MessageRole::System => return None,
        };
        Some(Self {
            role,
            content: msg.content.clone(),
        })
    }
}

/// Success body of `POST /api/kafra-chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KafraChatReply {
    pub reply: String,
    /// RFC 3339 timestamp of when the reply was produced.
    pub timestamp: String,
    pub model: String,
}

/// Error body used by every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}
