//! Send message handler - the core chat flow.
//!
//! Orchestrates one chat turn end to end: validation, rate limiting, lazy
//! conversation creation, durable persistence of the user turn, the model
//! call with bounded retries, and graceful degradation to a fallback reply
//! when the model stays down.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::domain::assistant::{EMPTY_REPLY, FALLBACK_REPLY, SYSTEM_INSTRUCTION, TEMPERATURE};
use crate::domain::conversation::{
    Conversation, MessageContent, ModelContext, NewMessage, CONTEXT_WINDOW,
};
use crate::domain::foundation::{
    AuthenticatedUser, ConversationId, DomainError, MessageId, Timestamp,
};
use crate::ports::{
    ChatEventStore, ConversationStore, ModelProvider, ModelRequest, RetryDelay,
};

/// Maximum model call attempts per request, first try included.
pub const MAX_ATTEMPTS: u32 = 2;

/// Width of the sliding rate-limit window in seconds.
pub const RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Requests allowed inside one window before further ones are rejected.
pub const RATE_LIMIT_MAX_REQUESTS: u64 = 10;

/// Command to send one chat message.
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    /// The authenticated caller.
    pub user: AuthenticatedUser,
    /// Existing conversation, `None` to open a new one.
    pub conversation_id: Option<ConversationId>,
    /// Raw message text as received from the client.
    pub message: String,
}

impl SendMessageCommand {
    /// Creates a new send message command.
    pub fn new(
        user: AuthenticatedUser,
        conversation_id: Option<ConversationId>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user,
            conversation_id,
            message: message.into(),
        }
    }
}

/// Result of a successfully handled chat turn.
///
/// `degraded` is set when the reply is the static fallback because the model
/// was unavailable; the caller still receives a normal outcome.
#[derive(Debug, Clone)]
pub struct SendMessageOutcome {
    /// The assistant's reply text.
    pub reply: String,
    /// Id of the persisted assistant turn.
    pub message_id: MessageId,
    /// The conversation the turn belongs to.
    pub conversation_id: ConversationId,
    /// True when the reply is the fallback served after model failure.
    pub degraded: bool,
}

/// Errors from the send message flow.
#[derive(Debug, Error)]
pub enum SendMessageError {
    /// The message payload failed validation.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The caller exceeded the sliding-window rate limit.
    #[error("Too many requests, please slow down")]
    RateLimited,

    /// A store operation on the critical path failed.
    #[error(transparent)]
    Storage(#[from] DomainError),
}

/// Handler for sending a chat message.
///
/// Generic over its ports so tests can substitute in-memory fakes. The
/// parameters accept unsized types, so the HTTP layer can hold the handler
/// with `Arc<dyn Port>` ports.
pub struct SendMessageHandler<S, E, M, D>
where
    S: ConversationStore + ?Sized,
    E: ChatEventStore + ?Sized,
    M: ModelProvider + ?Sized,
    D: RetryDelay + ?Sized,
{
    conversations: Arc<S>,
    events: Arc<E>,
    model: Arc<M>,
    delay: Arc<D>,
}

impl<S, E, M, D> SendMessageHandler<S, E, M, D>
where
    S: ConversationStore + ?Sized,
    E: ChatEventStore + ?Sized,
    M: ModelProvider + ?Sized,
    D: RetryDelay + ?Sized,
{
    /// Creates a new handler with the given ports.
    pub fn new(conversations: Arc<S>, events: Arc<E>, model: Arc<M>, delay: Arc<D>) -> Self {
        Self {
            conversations,
            events,
            model,
            delay,
        }
    }

    /// Handles one chat turn.
    ///
    /// The user turn is persisted before the model is called, so user input
    /// survives a model outage. Model failure never fails the request: after
    /// the retry budget is spent the caller gets the fallback reply and the
    /// outcome is marked degraded.
    pub async fn handle(
        &self,
        command: SendMessageCommand,
    ) -> Result<SendMessageOutcome, SendMessageError> {
        // 1. Validate the message payload
        let content = MessageContent::new(command.message)
            .map_err(|e| SendMessageError::InvalidRequest(e.to_string()))?;

        // 2. Sliding-window rate check; a failed count never blocks the request
        let window_start = Timestamp::now().minus_secs(RATE_LIMIT_WINDOW_SECS);
        match self.events.count_since(&command.user.id, window_start).await {
            Ok(count) if count > RATE_LIMIT_MAX_REQUESTS => {
                return Err(SendMessageError::RateLimited);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(
                    user_id = %command.user.id,
                    error = %e,
                    "Rate-limit count failed, allowing request through"
                );
            }
        }

        // 3. Resolve the conversation, opening one lazily on the first turn
        let conversation_id = match command.conversation_id {
            Some(id) => id,
            None => {
                let conversation = Conversation::open(command.user.id.clone(), content.as_str());
                self.conversations.create(&conversation).await?;
                tracing::info!(
                    conversation_id = %conversation.id,
                    user_id = %command.user.id,
                    "Opened new conversation"
                );
                conversation.id
            }
        };

        // 4. Persist the user turn before any model call
        let user_turn = NewMessage::user(conversation_id, command.user.id.clone(), content.as_str());
        self.conversations.append_message(&user_turn).await?;

        // 5. Rebuild bounded context from stored history
        let history = self
            .conversations
            .recent_messages(&conversation_id, CONTEXT_WINDOW as u32)
            .await?;
        let context = ModelContext::from_history(&history);

        // 6. Call the model, retrying transient failures once
        let request = ModelRequest::new(SYSTEM_INSTRUCTION.as_str(), TEMPERATURE, content.as_str())
            .with_history(context);
        let (reply, degraded) = self.generate_reply(request).await;

        // 7. Persist the assistant turn and assemble the outcome
        let model_turn = NewMessage::model(conversation_id, reply.clone());
        let stored = self.conversations.append_message(&model_turn).await?;

        Ok(SendMessageOutcome {
            reply,
            message_id: stored.id,
            conversation_id,
            degraded,
        })
    }

    /// Runs the model call with linear backoff between attempts.
    ///
    /// Only retryable errors consume further attempts; terminal errors and
    /// exhaustion both degrade to the fallback reply.
    async fn generate_reply(&self, request: ModelRequest) -> (String, bool) {
        for attempt in 1..=MAX_ATTEMPTS {
            match self.model.complete(request.clone()).await {
                Ok(reply) => {
                    if reply.content.trim().is_empty() {
                        tracing::warn!(model = %reply.model, "Model returned an empty reply");
                        return (EMPTY_REPLY.to_string(), false);
                    }
                    return (reply.content, false);
                }
                Err(e) if e.is_retryable() && attempt < MAX_ATTEMPTS => {
                    tracing::warn!(attempt, error = %e, "Transient model failure, retrying");
                    self.delay.wait(Duration::from_secs(attempt as u64)).await;
                }
                Err(e) => {
                    tracing::error!(attempt, error = %e, "Model call failed, serving fallback");
                    return (FALLBACK_REPLY.to_string(), true);
                }
            }
        }
        (FALLBACK_REPLY.to_string(), true)
    }
}
