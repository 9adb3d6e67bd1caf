//! Chat event store port.
//!
//! Defines the contract for writing audit records and for the sliding-window
//! request count that backs rate limiting.

use async_trait::async_trait;

use crate::domain::audit::ChatEvent;
use crate::domain::foundation::{DomainError, Timestamp, UserId};

/// Store port for per-request audit events.
///
/// # Contract
///
/// - `record` surfaces persistence errors to the caller; the caller decides
///   whether a failed audit write may fail the request (it does not)
/// - `count_since` counts the caller's events recorded at or after `since`,
///   which makes it usable as a sliding-window rate check
#[async_trait]
pub trait ChatEventStore: Send + Sync {
    /// Record one audit event.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn record(&self, event: &ChatEvent) -> Result<(), DomainError>;

    /// Number of events recorded for `user_id` since the given instant.
    async fn count_since(&self, user_id: &UserId, since: Timestamp) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_event_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn ChatEventStore) {}
    }
}
