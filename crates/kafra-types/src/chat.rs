//! Chat message types for Kafra conversations.
//!
//! A [`ChatMessage`] is created whenever the user sends text or the bot
//! replies. Messages live only in memory for the lifetime of a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::llm::{Message, MessageRole};

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

impl From<Sender> for MessageRole {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::User => MessageRole::User,
            Sender::Bot => MessageRole::Assistant,
        }
    }
}

/// A single message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message stamped with the current time and a fresh id.
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: Uuid::now_v7(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Bot)
    }

    /// Convert into an LLM conversation message (bot -> assistant).
    pub fn to_llm_message(&self) -> Message {
        Message {
            role: self.sender.into(),
            content: self.text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_serde() {
        let json = serde_json::to_string(&Sender::Bot).unwrap();
        assert_eq!(json, "\"bot\"");
        let parsed: Sender = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(parsed, Sender::User);
    }

    #[test]
    fn test_sender_from_str_rejects_unknown() {
        assert_eq!("BOT".parse::<Sender>().unwrap(), Sender::Bot);
        assert!("assistant".parse::<Sender>().is_err());
    }

    #[test]
    fn test_bot_message_maps_to_assistant_role() {
        let msg = ChatMessage::bot("สวัสดีค่ะ");
        let llm = msg.to_llm_message();
        assert_eq!(llm.role, MessageRole::Assistant);
        assert_eq!(llm.content, "สวัสดีค่ะ");
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = ChatMessage::user("a");
        let b = ChatMessage::user("a");
        assert_ne!(a.id, b.id);
        assert!(b.timestamp >= a.timestamp);
    }
}
