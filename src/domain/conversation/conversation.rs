//! Conversation entity: a titled, user-owned thread of messages.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversationId, Timestamp, UserId};

/// Number of characters of the opening message used for the derived title.
pub const TITLE_PREFIX_CHARS: usize = 30;

/// A titled, user-owned thread of messages.
///
/// Created lazily on the first message of a session when the caller supplies
/// no identifier. Never deleted by this subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique identifier.
    pub id: ConversationId,
    /// The owning user.
    pub user_id: UserId,
    /// Display title derived from the opening message.
    pub title: String,
    /// When the conversation was created.
    pub created_at: Timestamp,
}

impl Conversation {
    /// Creates a conversation from its opening message.
    ///
    /// The title is the first [`TITLE_PREFIX_CHARS`] characters of the
    /// message followed by an ellipsis marker.
    pub fn open(user_id: UserId, first_message: &str) -> Self {
        Self {
            id: ConversationId::new(),
            user_id,
            title: derive_title(first_message),
            created_at: Timestamp::now(),
        }
    }
}

/// Derives a display title from a conversation's opening message.
///
/// Truncation is on character boundaries, so multi-byte text is safe.
pub fn derive_title(first_message: &str) -> String {
    let prefix: String = first_message.chars().take(TITLE_PREFIX_CHARS).collect();
    format!("{}...", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_title_truncates_long_message() {
        let message = "Gostaria de saber mais sobre o curso de Compliance e quanto custa";
        let title = derive_title(message);

        assert_eq!(title, "Gostaria de saber mais sobre o...");
        assert_eq!(title.chars().count(), TITLE_PREFIX_CHARS + 3);
    }

    #[test]
    fn derive_title_keeps_short_message_whole() {
        let title = derive_title("Olá");
        assert_eq!(title, "Olá...");
    }

    #[test]
    fn derive_title_is_char_boundary_safe() {
        // 40 multi-byte characters; byte-indexed truncation would panic.
        let message = "é".repeat(40);
        let title = derive_title(&message);

        assert_eq!(title.chars().count(), TITLE_PREFIX_CHARS + 3);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn open_derives_title_and_owner() {
        let user_id = UserId::new("user-123").unwrap();
        let conversation = Conversation::open(user_id.clone(), "Qual curso recomendam?");

        assert_eq!(conversation.user_id, user_id);
        assert_eq!(conversation.title, "Qual curso recomendam?...");
    }

    #[test]
    fn open_generates_unique_ids() {
        let user_id = UserId::new("user-123").unwrap();
        let a = Conversation::open(user_id.clone(), "Primeira");
        let b = Conversation::open(user_id, "Segunda");

        assert_ne!(a.id, b.id);
    }
}
