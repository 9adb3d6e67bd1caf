//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers own the request flow; the HTTP layer stays a thin translation.

pub mod handlers;

pub use handlers::{
    SendMessageCommand, SendMessageError, SendMessageHandler, SendMessageOutcome, MAX_ATTEMPTS,
    RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW_SECS,
};
