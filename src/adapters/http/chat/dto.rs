//! HTTP DTOs for the chat endpoint.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request body for POST /api/chat.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Raw message text.
    pub message: String,
    /// Existing conversation to continue; absent to open a new one.
    #[serde(default)]
    pub conversation_id: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response body for a handled chat turn.
///
/// Degraded replies are indistinguishable from normal ones here; the caller
/// always sees a 200 with reply text in `message`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// The assistant's reply text.
    pub message: String,
    /// Conversation the turn belongs to; echo it back to continue the thread.
    pub conversation_id: String,
    /// Id of the persisted assistant turn.
    pub message_id: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response: `{"error": "..."}` on every non-200 path.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
