//! Model provider port for language-model completions.
//!
//! Abstracts the call to the generative model behind the assistant, so the
//! chat flow can produce replies without coupling to a specific vendor API.
//!
//! # Design
//!
//! - Single-shot completions only; the chat flow has no streaming surface
//! - Carries the prior turns explicitly because the model call is stateless
//! - Error taxonomy separates transient failures (worth a retry) from
//!   terminal ones

use async_trait::async_trait;

use crate::domain::conversation::ModelContext;

/// Port for generating assistant replies from a language model.
///
/// Implementations connect to an external model API and translate between
/// its wire format and our domain types.
///
/// # Contract
///
/// - `Err(e)` with `e.is_retryable()` means the same request may succeed if
///   repeated shortly after
/// - Any other error is terminal for this request
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Generate a single completion for the given request.
    async fn complete(&self, request: ModelRequest) -> Result<ModelReply, ModelError>;
}

/// One completion request: persona, sampling, history, and the current turn.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    /// System instruction sent with every call.
    pub system_instruction: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Prior turns of the conversation, oldest first.
    pub history: ModelContext,
    /// The current user message, sent as the closing turn.
    pub message: String,
}

impl ModelRequest {
    /// Creates a request with no prior history.
    pub fn new(
        system_instruction: impl Into<String>,
        temperature: f32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            temperature,
            history: ModelContext::default(),
            message: message.into(),
        }
    }

    /// Attaches prior conversation turns.
    pub fn with_history(mut self, history: ModelContext) -> Self {
        self.history = history;
        self
    }
}

/// A completed model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    /// Generated text.
    pub content: String,
    /// Model that produced the reply.
    pub model: String,
}

impl ModelReply {
    /// Creates a reply.
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
        }
    }
}

/// Model provider errors.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Rate limited by the provider.
    #[error("model provider rate limited")]
    RateLimited,

    /// Provider is temporarily unavailable.
    #[error("model provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// API key rejected by the provider.
    #[error("authentication with model provider failed")]
    AuthenticationFailed,

    /// Request was malformed or rejected before generation.
    #[error("invalid model request: {0}")]
    InvalidRequest(String),

    /// Provider returned an unexpected or unparseable response.
    #[error("provider error: {0}")]
    Provider(String),
}

impl ModelError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Creates a provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    /// Returns true if the same request may succeed when repeated.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ModelError::RateLimited
                | ModelError::Unavailable { .. }
                | ModelError::Network(_)
                | ModelError::Timeout { .. }
        )
    }
}
