//! Retry delay port.
//!
//! Injected sleep used between model call attempts, so the retry loop can be
//! unit-tested without real delays.

use std::time::Duration;

use async_trait::async_trait;

/// Waits between retry attempts.
///
/// The production implementation sleeps on the tokio timer; tests substitute
/// a recording no-op.
#[async_trait]
pub trait RetryDelay: Send + Sync {
    /// Wait for the given duration.
    async fn wait(&self, delay: Duration);
}
