//! Application handlers.
//!
//! Command handlers that orchestrate domain operations across the ports.

pub mod chat;

pub use chat::{
    SendMessageCommand, SendMessageError, SendMessageHandler, SendMessageOutcome, MAX_ATTEMPTS,
    RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW_SECS,
};
