//! Mock model provider for testing.
//!
//! Provides a configurable mock implementation of the ModelProvider port,
//! allowing tests to run without calling the real Gemini API.
//!
//! # Features
//!
//! - Pre-configured replies, consumed in order
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockModelProvider::new()
//!     .with_reply("Temos três cursos disponíveis.")
//!     .with_model_error(MockModelError::RateLimited);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{ModelError, ModelProvider, ModelReply, ModelRequest};

/// Mock model provider for testing.
///
/// Configurable to return specific replies or inject errors.
#[derive(Debug, Clone, Default)]
pub struct MockModelProvider {
    /// Pre-configured replies (consumed in order).
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<ModelRequest>>>,
}

/// A configured mock reply.
#[derive(Debug, Clone)]
enum MockReply {
    Success(String),
    Error(MockModelError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockModelError {
    /// Simulate rate limiting.
    RateLimited,
    /// Simulate provider unavailable.
    Unavailable { message: String },
    /// Simulate network error.
    Network { message: String },
    /// Simulate timeout.
    Timeout { timeout_secs: u32 },
    /// Simulate authentication failure.
    AuthenticationFailed,
    /// Simulate a rejected request.
    InvalidRequest { message: String },
}

impl From<MockModelError> for ModelError {
    fn from(err: MockModelError) -> Self {
        match err {
            MockModelError::RateLimited => ModelError::RateLimited,
            MockModelError::Unavailable { message } => ModelError::unavailable(message),
            MockModelError::Network { message } => ModelError::network(message),
            MockModelError::Timeout { timeout_secs } => ModelError::Timeout { timeout_secs },
            MockModelError::AuthenticationFailed => ModelError::AuthenticationFailed,
            MockModelError::InvalidRequest { message } => ModelError::invalid_request(message),
        }
    }
}

impl MockModelProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a successful reply to the queue.
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Success(content.into()));
        self
    }

    /// Adds an error to the queue.
    pub fn with_model_error(self, error: MockModelError) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Error(error));
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<ModelRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Clears the call history.
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Gets the next reply or a default.
    fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockReply::Success("Mock reply".to_string()))
    }
}

#[async_trait]
impl ModelProvider for MockModelProvider {
    async fn complete(&self, request: ModelRequest) -> Result<ModelReply, ModelError> {
        self.calls.lock().unwrap().push(request);

        match self.next_reply() {
            MockReply::Success(content) => Ok(ModelReply::new(content, "mock-model")),
            MockReply::Error(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_request() -> ModelRequest {
        ModelRequest::new("persona", 0.7, "Olá")
    }

    #[tokio::test]
    async fn mock_provider_returns_configured_reply() {
        let provider = MockModelProvider::new().with_reply("Olá! Posso ajudar?");

        let reply = provider.complete(test_request()).await.unwrap();

        assert_eq!(reply.content, "Olá! Posso ajudar?");
        assert_eq!(reply.model, "mock-model");
    }

    #[tokio::test]
    async fn mock_provider_returns_replies_in_order() {
        let provider = MockModelProvider::new()
            .with_reply("First")
            .with_reply("Second");

        let r1 = provider.complete(test_request()).await.unwrap();
        let r2 = provider.complete(test_request()).await.unwrap();

        assert_eq!(r1.content, "First");
        assert_eq!(r2.content, "Second");
    }

    #[tokio::test]
    async fn mock_provider_returns_default_after_exhausted() {
        let provider = MockModelProvider::new().with_reply("Only one");

        provider.complete(test_request()).await.unwrap();
        let r2 = provider.complete(test_request()).await.unwrap();

        assert_eq!(r2.content, "Mock reply");
    }

    #[tokio::test]
    async fn mock_provider_returns_configured_error() {
        let provider = MockModelProvider::new().with_model_error(MockModelError::RateLimited);

        let result = provider.complete(test_request()).await;

        let err = result.unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(err, ModelError::RateLimited));
    }

    #[tokio::test]
    async fn mock_provider_mixes_errors_and_replies() {
        let provider = MockModelProvider::new()
            .with_model_error(MockModelError::Unavailable {
                message: "overloaded".to_string(),
            })
            .with_reply("Recovered");

        assert!(provider.complete(test_request()).await.is_err());
        let reply = provider.complete(test_request()).await.unwrap();
        assert_eq!(reply.content, "Recovered");
    }

    #[tokio::test]
    async fn mock_provider_tracks_calls() {
        let provider = MockModelProvider::new().with_reply("r1").with_reply("r2");

        assert_eq!(provider.call_count(), 0);

        provider.complete(test_request()).await.unwrap();
        provider.complete(test_request()).await.unwrap();
        assert_eq!(provider.call_count(), 2);

        provider.clear_calls();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn mock_provider_records_request_content() {
        let provider = MockModelProvider::new().with_reply("ok");

        provider
            .complete(ModelRequest::new("persona", 0.7, "Quanto custa?"))
            .await
            .unwrap();

        let calls = provider.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].message, "Quanto custa?");
    }

    #[test]
    fn mock_error_converts_to_model_error() {
        let err: ModelError = MockModelError::RateLimited.into();
        assert!(matches!(err, ModelError::RateLimited));

        let err: ModelError = MockModelError::Timeout { timeout_secs: 30 }.into();
        assert!(matches!(err, ModelError::Timeout { timeout_secs: 30 }));

        let err: ModelError = MockModelError::AuthenticationFailed.into();
        assert!(matches!(err, ModelError::AuthenticationFailed));
    }
}
