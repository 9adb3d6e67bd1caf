//! Tokio-backed implementation of the RetryDelay port.

use std::time::Duration;

use async_trait::async_trait;

use crate::ports::RetryDelay;

/// Waits on the tokio timer between model call attempts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioRetryDelay;

#[async_trait]
impl RetryDelay for TokioRetryDelay {
    async fn wait(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
