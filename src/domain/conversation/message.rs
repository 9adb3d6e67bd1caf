//! Message types for conversation turns.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ConversationId, MessageId, Timestamp, UserId, ValidationError,
};

/// Maximum accepted length of an incoming chat message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Role of a message author within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// A turn written by the end user.
    User,
    /// A turn produced by the language model.
    Model,
}

impl MessageRole {
    /// Returns the wire/storage name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Model => "model",
        }
    }
}

/// Validated content of an incoming chat message.
///
/// Guarantees the text is non-empty after trimming and no longer than
/// [`MAX_MESSAGE_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    /// Validates and wraps raw message text.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ValidationError::empty_field("message"));
        }
        let len = raw.chars().count();
        if len > MAX_MESSAGE_CHARS {
            return Err(ValidationError::too_long("message", MAX_MESSAGE_CHARS, len));
        }
        Ok(Self(raw))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the value, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for MessageContent {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A message turn ready to be appended to a conversation.
///
/// User turns carry the author's identifier; model turns do not.
#[derive(Debug, Clone)]
pub struct NewMessage {
    /// The conversation this turn belongs to.
    pub conversation_id: ConversationId,
    /// Who authored the turn.
    pub role: MessageRole,
    /// The turn text.
    pub content: String,
    /// Authoring user, `None` for model turns.
    pub author: Option<UserId>,
}

impl NewMessage {
    /// Creates a user turn.
    pub fn user(
        conversation_id: ConversationId,
        author: UserId,
        content: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id,
            role: MessageRole::User,
            content: content.into(),
            author: Some(author),
        }
    }

    /// Creates a model turn.
    pub fn model(conversation_id: ConversationId, content: impl Into<String>) -> Self {
        Self {
            conversation_id,
            role: MessageRole::Model,
            content: content.into(),
            author: None,
        }
    }
}

/// A message as read back from the store.
///
/// Immutable once written; a conversation's message sequence is append-only
/// and ordered by `created_at` ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Unique ID of this message.
    pub id: MessageId,
    /// The conversation this turn belongs to.
    pub conversation_id: ConversationId,
    /// Who authored the turn.
    pub role: MessageRole,
    /// The turn text.
    pub content: String,
    /// Authoring user, `None` for model turns.
    pub author: Option<UserId>,
    /// When the message was created.
    pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_content_accepts_ordinary_text() {
        let content = MessageContent::new("Qual curso é melhor para contratos?").unwrap();
        assert_eq!(content.as_str(), "Qual curso é melhor para contratos?");
    }

    #[test]
    fn message_content_rejects_empty_string() {
        let result = MessageContent::new("");
        assert!(matches!(result, Err(ValidationError::EmptyField { .. })));
    }

    #[test]
    fn message_content_rejects_whitespace_only() {
        let result = MessageContent::new("   \n\t  ");
        assert!(matches!(result, Err(ValidationError::EmptyField { .. })));
    }

    #[test]
    fn message_content_accepts_exactly_max_chars() {
        let raw = "a".repeat(MAX_MESSAGE_CHARS);
        assert!(MessageContent::new(raw).is_ok());
    }

    #[test]
    fn message_content_rejects_over_max_chars() {
        let raw = "a".repeat(MAX_MESSAGE_CHARS + 1);
        let result = MessageContent::new(raw);
        match result {
            Err(ValidationError::TooLong { max, actual, .. }) => {
                assert_eq!(max, MAX_MESSAGE_CHARS);
                assert_eq!(actual, MAX_MESSAGE_CHARS + 1);
            }
            other => panic!("Expected TooLong error, got {:?}", other),
        }
    }

    #[test]
    fn message_content_counts_characters_not_bytes() {
        // 2000 'é' chars is 4000 bytes but still within the limit.
        let raw = "é".repeat(MAX_MESSAGE_CHARS);
        assert!(MessageContent::new(raw).is_ok());
    }

    #[test]
    fn message_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MessageRole::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&MessageRole::Model).unwrap(),
            "\"model\""
        );
    }

    #[test]
    fn new_message_user_carries_author() {
        let conversation_id = ConversationId::new();
        let author = UserId::new("user-123").unwrap();
        let msg = NewMessage::user(conversation_id, author.clone(), "Olá");

        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.author, Some(author));
        assert_eq!(msg.content, "Olá");
    }

    #[test]
    fn new_message_model_has_no_author() {
        let msg = NewMessage::model(ConversationId::new(), "Posso ajudar?");

        assert_eq!(msg.role, MessageRole::Model);
        assert!(msg.author.is_none());
    }
}
