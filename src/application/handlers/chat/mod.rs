//! Chat command handlers.

mod send_message;

pub use send_message::{
    // Command and outcome
    SendMessageCommand,
    SendMessageError,
    SendMessageHandler,
    SendMessageOutcome,
    // Policy constants
    MAX_ATTEMPTS,
    RATE_LIMIT_MAX_REQUESTS,
    RATE_LIMIT_WINDOW_SECS,
};
