//! HTTP handler for the chat endpoint.
//!
//! Connects the axum route to the send message handler and owns the two
//! concerns that belong to the HTTP edge: translating outcomes to status
//! codes, and writing exactly one audit event per request.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::application::{SendMessageCommand, SendMessageError, SendMessageHandler};
use crate::domain::audit::{ChatEvent, ErrorKind, OriginHash};
use crate::domain::foundation::{AuthError, ConversationId, UserId};
use crate::ports::{ChatEventStore, ConversationStore, ModelProvider, RetryDelay};

use super::dto::{ChatRequest, ChatResponse, ErrorResponse};
use crate::adapters::http::middleware::AuthAttempt;

/// Send message handler with its ports type-erased for shared state.
pub type DynSendMessageHandler = SendMessageHandler<
    dyn ConversationStore,
    dyn ChatEventStore,
    dyn ModelProvider,
    dyn RetryDelay,
>;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for chat handlers.
#[derive(Clone)]
pub struct ChatAppState {
    pub send_message: Arc<DynSendMessageHandler>,
    pub events: Arc<dyn ChatEventStore>,
}

impl ChatAppState {
    /// Creates a new ChatAppState.
    pub fn new(send_message: Arc<DynSendMessageHandler>, events: Arc<dyn ChatEventStore>) -> Self {
        Self {
            send_message,
            events,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/chat
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/chat - Send one chat message.
///
/// Returns the assistant's reply along with the conversation and message
/// ids. A degraded reply still returns 200; the audit event is what records
/// the underlying model failure.
///
/// # Errors
/// - 400 Bad Request: invalid message or malformed conversation id
/// - 401 Unauthorized: missing or rejected token
/// - 429 Too Many Requests: sliding-window rate limit exceeded
/// - 500 Internal Server Error: storage failure on the critical path
pub async fn post_chat(
    State(state): State<ChatAppState>,
    attempt: AuthAttempt,
    headers: HeaderMap,
    Json(body): Json<ChatRequest>,
) -> Response {
    let started = Instant::now();
    let origin = OriginHash::from_forwarded(
        headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()),
    );

    // Enforce authentication here, not in middleware, so rejected requests
    // still produce an audit event.
    let user = match attempt {
        AuthAttempt::Authenticated(user) => user,
        AuthAttempt::Failed(e) => {
            let message = match &e {
                AuthError::TokenExpired => "Token expired",
                AuthError::ServiceUnavailable(msg) => {
                    tracing::error!("Auth service unavailable: {}", msg);
                    "Authentication required"
                }
                _ => "Authentication required",
            };
            record_event(
                &state,
                None,
                origin,
                StatusCode::UNAUTHORIZED,
                started,
                Some(ErrorKind::AuthError),
            )
            .await;
            return (StatusCode::UNAUTHORIZED, Json(ErrorResponse::new(message))).into_response();
        }
    };
    let user_id = user.id.clone();

    let conversation_id = match body.conversation_id.as_deref() {
        Some(raw) => match raw.parse::<ConversationId>() {
            Ok(id) => Some(id),
            Err(_) => {
                record_event(
                    &state,
                    Some(user_id),
                    origin,
                    StatusCode::BAD_REQUEST,
                    started,
                    Some(ErrorKind::ValidationError),
                )
                .await;
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new("Invalid conversation id format")),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let command = SendMessageCommand::new(user, conversation_id, body.message);
    match state.send_message.handle(command).await {
        Ok(outcome) => {
            // The caller gets 200 either way; the audit row keeps the truth
            // about a degraded model path.
            let (audit_status, error_kind) = if outcome.degraded {
                (StatusCode::SERVICE_UNAVAILABLE, Some(ErrorKind::AiServiceError))
            } else {
                (StatusCode::OK, None)
            };
            record_event(&state, Some(user_id), origin, audit_status, started, error_kind).await;

            (
                StatusCode::OK,
                Json(ChatResponse {
                    message: outcome.reply,
                    conversation_id: outcome.conversation_id.to_string(),
                    message_id: outcome.message_id.to_string(),
                }),
            )
                .into_response()
        }
        Err(SendMessageError::InvalidRequest(message)) => {
            record_event(
                &state,
                Some(user_id),
                origin,
                StatusCode::BAD_REQUEST,
                started,
                Some(ErrorKind::ValidationError),
            )
            .await;
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(message)),
            )
                .into_response()
        }
        Err(SendMessageError::RateLimited) => {
            record_event(
                &state,
                Some(user_id),
                origin,
                StatusCode::TOO_MANY_REQUESTS,
                started,
                Some(ErrorKind::RateLimited),
            )
            .await;
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorResponse::new("Too many requests, please slow down")),
            )
                .into_response()
        }
        Err(SendMessageError::Storage(e)) => {
            tracing::error!(error = %e, "Chat request failed on storage");
            record_event(
                &state,
                Some(user_id),
                origin,
                StatusCode::INTERNAL_SERVER_ERROR,
                started,
                Some(ErrorKind::InternalError),
            )
            .await;
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("An internal error occurred")),
            )
                .into_response()
        }
    }
}

/// Writes the per-request audit event; failures are logged and swallowed.
async fn record_event(
    state: &ChatAppState,
    user_id: Option<UserId>,
    origin: OriginHash,
    status: StatusCode,
    started: Instant,
    error_kind: Option<ErrorKind>,
) {
    let latency_ms = started.elapsed().as_millis() as u64;
    let mut event = ChatEvent::new(user_id, origin, status.as_u16(), latency_ms);
    if let Some(kind) = error_kind {
        event = event.with_error(kind);
    }
    if let Err(e) = state.events.record(&event).await {
        tracing::warn!(error = %e, "Failed to record chat event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::domain::conversation::{Conversation, NewMessage, StoredMessage};
    use crate::domain::foundation::{
        AuthenticatedUser, DomainError, MessageId, Timestamp,
    };
    use crate::ports::{ModelError, ModelReply, ModelRequest};

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    struct MemoryConversationStore {
        messages: Mutex<Vec<StoredMessage>>,
        fail_append: bool,
    }

    impl MemoryConversationStore {
        fn new() -> Self {
            Self {
                messages: Mutex::new(Vec::new()),
                fail_append: false,
            }
        }

        fn failing_append() -> Self {
            Self {
                fail_append: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl ConversationStore for MemoryConversationStore {
        async fn create(&self, _conversation: &Conversation) -> Result<(), DomainError> {
            Ok(())
        }

        async fn append_message(&self, message: &NewMessage) -> Result<StoredMessage, DomainError> {
            if self.fail_append {
                return Err(DomainError::database("append failed"));
            }
            let stored = StoredMessage {
                id: MessageId::new(),
                conversation_id: message.conversation_id,
                role: message.role,
                content: message.content.clone(),
                author: message.author.clone(),
                created_at: Timestamp::now(),
            };
            self.messages.lock().unwrap().push(stored.clone());
            Ok(stored)
        }

        async fn recent_messages(
            &self,
            conversation_id: &ConversationId,
            limit: u32,
        ) -> Result<Vec<StoredMessage>, DomainError> {
            let messages = self.messages.lock().unwrap();
            let mut rows: Vec<StoredMessage> = messages
                .iter()
                .filter(|m| &m.conversation_id == conversation_id)
                .cloned()
                .collect();
            let keep = rows.len().saturating_sub(limit as usize);
            Ok(rows.split_off(keep))
        }
    }

    struct RecordingEventStore {
        count: u64,
        events: Mutex<Vec<ChatEvent>>,
    }

    impl RecordingEventStore {
        fn with_count(count: u64) -> Self {
            Self {
                count,
                events: Mutex::new(Vec::new()),
            }
        }

        fn recorded(&self) -> Vec<ChatEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatEventStore for RecordingEventStore {
        async fn record(&self, event: &ChatEvent) -> Result<(), DomainError> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }

        async fn count_since(
            &self,
            _user_id: &UserId,
            _since: Timestamp,
        ) -> Result<u64, DomainError> {
            Ok(self.count)
        }
    }

    struct ScriptedModel {
        results: Mutex<Vec<Result<ModelReply, ModelError>>>,
    }

    impl ScriptedModel {
        fn replying(content: &str) -> Self {
            Self {
                results: Mutex::new(vec![Ok(ModelReply::new(content, "test-model"))]),
            }
        }

        fn failing() -> Self {
            Self {
                results: Mutex::new(vec![
                    Err(ModelError::unavailable("down")),
                    Err(ModelError::unavailable("still down")),
                ]),
            }
        }
    }

    #[async_trait]
    impl ModelProvider for ScriptedModel {
        async fn complete(&self, _request: ModelRequest) -> Result<ModelReply, ModelError> {
            let mut results = self.results.lock().unwrap();
            if results.is_empty() {
                return Ok(ModelReply::new("resposta padrão", "test-model"));
            }
            results.remove(0)
        }
    }

    struct NoopDelay;

    #[async_trait]
    impl RetryDelay for NoopDelay {
        async fn wait(&self, _delay: std::time::Duration) {}
    }

    fn test_user() -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new("user-123").unwrap(),
            "aluno@example.com",
            Some("Aluno Teste".to_string()),
            true,
        )
    }

    fn state_with(
        store: Arc<MemoryConversationStore>,
        events: Arc<RecordingEventStore>,
        model: Arc<ScriptedModel>,
    ) -> ChatAppState {
        let handler: Arc<DynSendMessageHandler> = Arc::new(SendMessageHandler::new(
            store as Arc<dyn ConversationStore>,
            events.clone() as Arc<dyn ChatEventStore>,
            model as Arc<dyn ModelProvider>,
            Arc::new(NoopDelay) as Arc<dyn RetryDelay>,
        ));
        ChatAppState::new(handler, events)
    }

    fn chat_body(message: &str) -> Json<ChatRequest> {
        Json(ChatRequest {
            message: message.to_string(),
            conversation_id: None,
        })
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Status Mapping Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn success_returns_200_and_records_clean_event() {
        let events = Arc::new(RecordingEventStore::with_count(0));
        let state = state_with(
            Arc::new(MemoryConversationStore::new()),
            events.clone(),
            Arc::new(ScriptedModel::replying("Posso ajudar!")),
        );

        let response = post_chat(
            State(state),
            AuthAttempt::Authenticated(test_user()),
            HeaderMap::new(),
            chat_body("Olá"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let recorded = events.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].status_code, 200);
        assert!(recorded[0].error_kind.is_none());
        assert_eq!(recorded[0].user_id.as_ref().unwrap().as_str(), "user-123");
    }

    #[tokio::test]
    async fn missing_auth_returns_401_and_records_auth_error() {
        let events = Arc::new(RecordingEventStore::with_count(0));
        let state = state_with(
            Arc::new(MemoryConversationStore::new()),
            events.clone(),
            Arc::new(ScriptedModel::replying("olá")),
        );

        let response = post_chat(
            State(state),
            AuthAttempt::Failed(AuthError::MissingToken),
            HeaderMap::new(),
            chat_body("Olá"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let recorded = events.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].status_code, 401);
        assert_eq!(recorded[0].error_kind, Some(ErrorKind::AuthError));
        assert!(recorded[0].user_id.is_none());
    }

    #[tokio::test]
    async fn auth_service_outage_returns_401() {
        let events = Arc::new(RecordingEventStore::with_count(0));
        let state = state_with(
            Arc::new(MemoryConversationStore::new()),
            events.clone(),
            Arc::new(ScriptedModel::replying("olá")),
        );

        let response = post_chat(
            State(state),
            AuthAttempt::Failed(AuthError::ServiceUnavailable("timeout".to_string())),
            HeaderMap::new(),
            chat_body("Olá"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let recorded = events.recorded();
        assert_eq!(recorded[0].status_code, 401);
        assert_eq!(recorded[0].error_kind, Some(ErrorKind::AuthError));
    }

    #[tokio::test]
    async fn degraded_reply_returns_200_but_audits_503() {
        let events = Arc::new(RecordingEventStore::with_count(0));
        let state = state_with(
            Arc::new(MemoryConversationStore::new()),
            events.clone(),
            Arc::new(ScriptedModel::failing()),
        );

        let response = post_chat(
            State(state),
            AuthAttempt::Authenticated(test_user()),
            HeaderMap::new(),
            chat_body("Olá"),
        )
        .await;

        // The caller sees a normal reply; the audit trail sees the outage.
        assert_eq!(response.status(), StatusCode::OK);
        let recorded = events.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].status_code, 503);
        assert_eq!(recorded[0].error_kind, Some(ErrorKind::AiServiceError));
    }

    #[tokio::test]
    async fn empty_message_returns_400_validation_error() {
        let events = Arc::new(RecordingEventStore::with_count(0));
        let state = state_with(
            Arc::new(MemoryConversationStore::new()),
            events.clone(),
            Arc::new(ScriptedModel::replying("olá")),
        );

        let response = post_chat(
            State(state),
            AuthAttempt::Authenticated(test_user()),
            HeaderMap::new(),
            chat_body("   "),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let recorded = events.recorded();
        assert_eq!(recorded[0].status_code, 400);
        assert_eq!(recorded[0].error_kind, Some(ErrorKind::ValidationError));
    }

    #[tokio::test]
    async fn malformed_conversation_id_returns_400() {
        let events = Arc::new(RecordingEventStore::with_count(0));
        let state = state_with(
            Arc::new(MemoryConversationStore::new()),
            events.clone(),
            Arc::new(ScriptedModel::replying("olá")),
        );

        let response = post_chat(
            State(state),
            AuthAttempt::Authenticated(test_user()),
            HeaderMap::new(),
            Json(ChatRequest {
                message: "Olá".to_string(),
                conversation_id: Some("not-a-uuid".to_string()),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            events.recorded()[0].error_kind,
            Some(ErrorKind::ValidationError)
        );
    }

    #[tokio::test]
    async fn rate_limited_returns_429() {
        let events = Arc::new(RecordingEventStore::with_count(11));
        let state = state_with(
            Arc::new(MemoryConversationStore::new()),
            events.clone(),
            Arc::new(ScriptedModel::replying("olá")),
        );

        let response = post_chat(
            State(state),
            AuthAttempt::Authenticated(test_user()),
            HeaderMap::new(),
            chat_body("Olá"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let recorded = events.recorded();
        assert_eq!(recorded[0].status_code, 429);
        assert_eq!(recorded[0].error_kind, Some(ErrorKind::RateLimited));
    }

    #[tokio::test]
    async fn storage_failure_returns_500_internal_error() {
        let events = Arc::new(RecordingEventStore::with_count(0));
        let state = state_with(
            Arc::new(MemoryConversationStore::failing_append()),
            events.clone(),
            Arc::new(ScriptedModel::replying("olá")),
        );

        let response = post_chat(
            State(state),
            AuthAttempt::Authenticated(test_user()),
            HeaderMap::new(),
            chat_body("Olá"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let recorded = events.recorded();
        assert_eq!(recorded[0].status_code, 500);
        assert_eq!(recorded[0].error_kind, Some(ErrorKind::InternalError));
    }

    #[tokio::test]
    async fn origin_hash_comes_from_forwarded_header() {
        let events = Arc::new(RecordingEventStore::with_count(0));
        let state = state_with(
            Arc::new(MemoryConversationStore::new()),
            events.clone(),
            Arc::new(ScriptedModel::replying("olá")),
        );

        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7".parse().unwrap());

        post_chat(
            State(state),
            AuthAttempt::Authenticated(test_user()),
            headers,
            chat_body("Olá"),
        )
        .await;

        let recorded = events.recorded();
        assert_eq!(
            recorded[0].origin_hash,
            OriginHash::from_forwarded(Some("203.0.113.7"))
        );
    }
}
