//! HTTP adapters - REST API implementations.
//!
//! - `chat` - the chat endpoint, its DTOs, and status mapping
//! - `health` - unauthenticated liveness probe
//! - `middleware` - bearer-token resolution

pub mod chat;
pub mod health;
pub mod middleware;

// Re-export key types for convenience
pub use chat::{chat_router, ChatAppState, DynSendMessageHandler};
pub use health::health_router;
pub use middleware::{resolve_session, AuthAttempt, AuthState};
