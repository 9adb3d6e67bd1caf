//! HTTP adapter for the chat endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::{ChatRequest, ChatResponse, ErrorResponse};
pub use handlers::{post_chat, ChatAppState, DynSendMessageHandler};
pub use routes::{chat_router, chat_routes};
