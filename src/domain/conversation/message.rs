//! Message entity for chat sessions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MessageId, Timestamp};

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// Content of a message.
///
/// `AwaitingEscalation` is the placeholder shown while the retrieval service
/// works. It is never sent to the generator and is only ever replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum MessageContent {
    Text(String),
    AwaitingEscalation,
}

impl MessageContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text),
            MessageContent::AwaitingEscalation => None,
        }
    }
}

/// A message within a conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    role: Role,
    content: MessageContent,
    timestamp: Timestamp,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, MessageContent::Text(text.into()))
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, MessageContent::Text(text.into()))
    }

    /// An assistant message holding the escalation placeholder.
    pub fn placeholder() -> Self {
        Self::new(Role::Assistant, MessageContent::AwaitingEscalation)
    }

    fn new(role: Role, content: MessageContent) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content,
            timestamp: Timestamp::now(),
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &MessageContent {
        &self.content
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.content, MessageContent::AwaitingEscalation)
    }

    /// Replaces the placeholder content with text, keeping id and position.
    ///
    /// Returns false (and changes nothing) if this is not a placeholder.
    pub(crate) fn resolve_placeholder(&mut self, text: String) -> bool {
        if !self.is_placeholder() {
            return false;
        }
        self.content = MessageContent::Text(text);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_roles() {
        assert_eq!(Message::user("hi").role(), Role::User);
        assert_eq!(Message::assistant("hello").role(), Role::Assistant);
        assert_eq!(Message::placeholder().role(), Role::Assistant);
    }

    #[test]
    fn placeholder_has_no_text() {
        let msg = Message::placeholder();
        assert!(msg.is_placeholder());
        assert_eq!(msg.content().as_text(), None);
    }

    #[test]
    fn resolve_placeholder_keeps_identity() {
        let mut msg = Message::placeholder();
        let id = msg.id();
        assert!(msg.resolve_placeholder("Schools nearby: ...".into()));
        assert_eq!(msg.id(), id);
        assert_eq!(msg.content().as_text(), Some("Schools nearby: ..."));
    }

    #[test]
    fn resolve_placeholder_ignores_text_messages() {
        let mut msg = Message::assistant("done");
        assert!(!msg.resolve_placeholder("again".into()));
        assert_eq!(msg.content().as_text(), Some("done"));
    }

    #[test]
    fn content_serializes_with_kind_tag() {
        let json = serde_json::to_value(MessageContent::AwaitingEscalation).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "awaiting_escalation"}));
        let json = serde_json::to_value(MessageContent::Text("a".into())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "text", "text": "a"}));
    }
}
