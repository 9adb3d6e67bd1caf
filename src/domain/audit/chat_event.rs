//! Audit records for chat requests.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{RequestId, Timestamp, UserId};

use super::OriginHash;

/// Error-kind tag recorded on a failed or degraded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// The request payload failed validation.
    ValidationError,
    /// The caller could not be authenticated.
    AuthError,
    /// The caller exceeded the sliding-window rate limit.
    RateLimited,
    /// The model was unavailable after all attempts; fallback reply served.
    AiServiceError,
    /// Unclassified failure on the critical path.
    InternalError,
}

impl ErrorKind {
    /// Returns the wire/storage name of this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "VALIDATION_ERROR",
            ErrorKind::AuthError => "AUTH_ERROR",
            ErrorKind::RateLimited => "RATE_LIMITED",
            ErrorKind::AiServiceError => "AI_SERVICE_ERROR",
            ErrorKind::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One audit record per request attempt, success or failure.
///
/// Written best-effort at the end of every request: a failed write is logged
/// and swallowed, never surfaced to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEvent {
    /// The authenticated user, `None` for pre-auth failures.
    pub user_id: Option<UserId>,
    /// Privacy-preserving hash of the caller's network origin.
    pub origin_hash: OriginHash,
    /// HTTP status code produced for the request. The degraded model path
    /// records 503 here even though the caller receives 200.
    pub status_code: u16,
    /// Wall-clock latency of the request in milliseconds.
    pub latency_ms: u64,
    /// Error-kind tag, `None` on clean success.
    pub error_kind: Option<ErrorKind>,
    /// Fresh correlation identifier for this request.
    pub request_id: RequestId,
    /// When the event was recorded.
    pub created_at: Timestamp,
}

impl ChatEvent {
    /// Creates an event with a fresh request id and the current time.
    pub fn new(
        user_id: Option<UserId>,
        origin_hash: OriginHash,
        status_code: u16,
        latency_ms: u64,
    ) -> Self {
        Self {
            user_id,
            origin_hash,
            status_code,
            latency_ms,
            error_kind: None,
            request_id: RequestId::new(),
            created_at: Timestamp::now(),
        }
    }

    /// Tags the event with an error kind.
    pub fn with_error(mut self, kind: ErrorKind) -> Self {
        self.error_kind = Some(kind);
        self
    }

    /// True when the event reflects a clean 2xx outcome.
    pub fn is_success(&self) -> bool {
        self.error_kind.is_none() && (200..300).contains(&self.status_code)
    }
}
