//! In-memory conversation for the terminal chat.
//!
//! Messages live only as long as the session value; nothing is persisted.

use kafra_types::chat::{ChatMessage, Sender};
use kafra_types::llm::Message;

use super::dispatcher::{ChatDispatcher, Reply};

/// Ordered list of user and bot messages.
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send a user message through the dispatcher.
    ///
    /// The dispatcher sees the history as it was before this message. Both
    /// the user message and the bot reply are appended; the reply is
    /// returned together with its source.
    pub async fn send(&mut self, dispatcher: &ChatDispatcher, text: &str) -> (ChatMessage, Reply) {
        let reply = dispatcher.respond(text, &self.messages).await;
        self.messages.push(ChatMessage::user(text.trim()));

        let bot = ChatMessage::bot(reply.text.clone());
        self.messages.push(bot.clone());
        (bot, reply)
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of messages the user has sent.
    pub fn user_turns(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.sender == Sender::User)
            .count()
    }

    /// The last `limit` messages as provider messages.
    pub fn to_llm_messages(&self, limit: usize) -> Vec<Message> {
        let skip = self.messages.len().saturating_sub(limit);
        self.messages[skip..]
            .iter()
            .map(ChatMessage::to_llm_message)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::dispatcher::{DispatcherConfig, ReplySource};
    use kafra_types::llm::MessageRole;

    fn offline_dispatcher() -> ChatDispatcher {
        ChatDispatcher::new(DispatcherConfig::default())
    }

    #[tokio::test]
    async fn test_send_appends_user_and_bot_messages() {
        let dispatcher = offline_dispatcher();
        let mut session = ChatSession::new();

        let (bot, reply) = session.send(&dispatcher, "  สวัสดีค่ะ ").await;
        assert!(matches!(reply.source, ReplySource::Offline { .. }));
        assert_eq!(bot.sender, Sender::Bot);
        assert_eq!(bot.text, reply.text);

        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].text, "สวัสดีค่ะ");
        assert_eq!(history[0].sender, Sender::User);
        assert_eq!(session.user_turns(), 1);
    }

    #[tokio::test]
    async fn test_clear_empties_history() {
        let dispatcher = offline_dispatcher();
        let mut session = ChatSession::new();
        session.send(&dispatcher, "hello").await;
        session.send(&dispatcher, "bye").await;
        assert_eq!(session.len(), 4);

        session.clear();
        assert!(session.is_empty());
    }

    #[test]
    fn test_to_llm_messages_keeps_tail() {
        let mut session = ChatSession::new();
        session.messages.push(ChatMessage::user("one"));
        session.messages.push(ChatMessage::bot("two"));
        session.messages.push(ChatMessage::user("three"));

        let messages = session.to_llm_messages(2);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::Assistant);
        assert_eq!(messages[0].content, "two");
        assert_eq!(messages[1].role, MessageRole::User);

        assert_eq!(session.to_llm_messages(50).len(), 3);
        assert!(session.to_llm_messages(0).is_empty());
    }
}
