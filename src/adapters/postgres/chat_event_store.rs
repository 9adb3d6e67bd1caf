//! PostgreSQL implementation of ChatEventStore.
//!
//! Persists per-request audit events and answers the sliding-window count
//! used by rate limiting.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::audit::ChatEvent;
use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::ports::ChatEventStore;

/// PostgreSQL implementation of ChatEventStore.
#[derive(Clone)]
pub struct PostgresChatEventStore {
    pool: PgPool,
}

impl PostgresChatEventStore {
    /// Creates a new PostgresChatEventStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatEventStore for PostgresChatEventStore {
    async fn record(&self, event: &ChatEvent) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO chat_events (
                request_id, user_id, origin_hash, status_code,
                latency_ms, error_kind, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(event.request_id.as_uuid())
        .bind(event.user_id.as_ref().map(|u| u.as_str().to_string()))
        .bind(event.origin_hash.as_str())
        .bind(i32::from(event.status_code))
        .bind(event.latency_ms as i64)
        .bind(event.error_kind.map(|k| k.as_str()))
        .bind(event.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert chat event: {}", e)))?;

        Ok(())
    }

    async fn count_since(&self, user_id: &UserId, since: Timestamp) -> Result<u64, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS event_count
            FROM chat_events
            WHERE user_id = $1 AND created_at >= $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(since.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to count chat events: {}", e)))?;

        let count: i64 = row.get("event_count");
        Ok(count.max(0) as u64)
    }
}
