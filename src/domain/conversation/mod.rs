//! Conversation domain: threads, message turns, and bounded model context.

mod context;
mod conversation;
mod message;

pub use context::{ContextTurn, ModelContext, CONTEXT_WINDOW};
pub use conversation::{derive_title, Conversation, TITLE_PREFIX_CHARS};
pub use message::{
    MessageContent, MessageRole, NewMessage, StoredMessage, MAX_MESSAGE_CHARS,
};
