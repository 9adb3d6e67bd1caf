//! PostgreSQL implementation of ConversationStore.
//!
//! Persists conversations and their append-only message turns.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::conversation::{Conversation, MessageRole, NewMessage, StoredMessage};
use crate::domain::foundation::{
    ConversationId, DomainError, ErrorCode, MessageId, Timestamp, UserId,
};
use crate::ports::ConversationStore;

/// PostgreSQL implementation of ConversationStore.
#[derive(Clone)]
pub struct PostgresConversationStore {
    pool: PgPool,
}

impl PostgresConversationStore {
    /// Creates a new PostgresConversationStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationStore for PostgresConversationStore {
    async fn create(&self, conversation: &Conversation) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO conversations (id, user_id, title, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(conversation.id.as_uuid())
        .bind(conversation.user_id.as_str())
        .bind(&conversation.title)
        .bind(conversation.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert conversation: {}", e)))?;

        Ok(())
    }

    async fn append_message(&self, message: &NewMessage) -> Result<StoredMessage, DomainError> {
        let id = MessageId::new();
        let created_at = Timestamp::now();

        sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, role, content, author, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id.as_uuid())
        .bind(message.conversation_id.as_uuid())
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(message.author.as_ref().map(|a| a.as_str().to_string()))
        .bind(created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => DomainError::new(
                ErrorCode::ConversationNotFound,
                format!("Conversation not found: {}", message.conversation_id),
            ),
            _ => DomainError::database(format!("Failed to insert message: {}", e)),
        })?;

        Ok(StoredMessage {
            id,
            conversation_id: message.conversation_id,
            role: message.role,
            content: message.content.clone(),
            author: message.author.clone(),
            created_at,
        })
    }

    async fn recent_messages(
        &self,
        conversation_id: &ConversationId,
        limit: u32,
    ) -> Result<Vec<StoredMessage>, DomainError> {
        // Newest rows first in the subquery, flipped back to chronological
        // order for the caller.
        let rows = sqlx::query(
            r#"
            SELECT id, conversation_id, role, content, author, created_at
            FROM (
                SELECT id, conversation_id, role, content, author, created_at
                FROM messages
                WHERE conversation_id = $1
                ORDER BY created_at DESC
                LIMIT $2
            ) recent
            ORDER BY created_at ASC
            "#,
        )
        .bind(conversation_id.as_uuid())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch messages: {}", e)))?;

        rows.iter()
            .map(|row| {
                let id: uuid::Uuid = row.get("id");
                let conversation_uuid: uuid::Uuid = row.get("conversation_id");
                let role_str: &str = row.get("role");
                let content: String = row.get("content");
                let author: Option<String> = row.get("author");
                let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

                let author = author.map(UserId::new).transpose()?;

                Ok(StoredMessage {
                    id: MessageId::from_uuid(id),
                    conversation_id: ConversationId::from_uuid(conversation_uuid),
                    role: str_to_role(role_str)?,
                    content,
                    author,
                    created_at: Timestamp::from_datetime(created_at),
                })
            })
            .collect()
    }
}

fn str_to_role(s: &str) -> Result<MessageRole, DomainError> {
    match s {
        "user" => Ok(MessageRole::User),
        "model" => Ok(MessageRole::Model),
        _ => Err(DomainError::database(format!(
            "Invalid message role: {}",
            s
        ))),
    }
}
