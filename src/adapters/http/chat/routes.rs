//! Axum routes for chat endpoints.

use axum::routing::post;
use axum::Router;

use super::handlers::{post_chat, ChatAppState};

/// Creates routes for chat endpoints.
///
/// REST Endpoints:
/// - POST /api/chat - Send one chat message
pub fn chat_routes() -> Router<ChatAppState> {
    Router::new().route("/chat", post(post_chat))
}

/// Combined router with all chat routes under /api.
pub fn chat_router() -> Router<ChatAppState> {
    Router::new().nest("/api", chat_routes())
}
