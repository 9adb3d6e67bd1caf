//! Audit domain: per-request chat events, independent of conversation content.

mod chat_event;
mod origin;

pub use chat_event::{ChatEvent, ErrorKind};
pub use origin::OriginHash;
