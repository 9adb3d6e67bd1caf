//! Conversation store port.
//!
//! Defines the contract for persisting conversations and their message
//! turns, and for reading back the recent history that feeds model context.
//!
//! # Design
//!
//! - **Append-only messages**: turns are never updated or deleted
//! - **Durability ordering**: the user turn is persisted before the model
//!   is called, so user input survives a model outage

use async_trait::async_trait;

use crate::domain::conversation::{Conversation, NewMessage, StoredMessage};
use crate::domain::foundation::{ConversationId, DomainError};

/// Store port for conversations and their messages.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Save a new conversation.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(&self, conversation: &Conversation) -> Result<(), DomainError>;

    /// Append a message turn to a conversation.
    ///
    /// The store assigns the message id and creation time. The conversation
    /// must exist.
    ///
    /// # Errors
    ///
    /// - `ConversationNotFound` if the conversation doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn append_message(&self, message: &NewMessage) -> Result<StoredMessage, DomainError>;

    /// The newest `limit` messages of a conversation, returned oldest-first.
    ///
    /// Selects the most recent rows and presents them in chronological
    /// order, ready to become model context.
    async fn recent_messages(
        &self,
        conversation_id: &ConversationId,
        limit: u32,
    ) -> Result<Vec<StoredMessage>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn ConversationStore) {}
    }
}
