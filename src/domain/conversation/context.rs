//! Bounded conversational context for stateless model calls.
//!
//! The model call holds no server-side session, so conversational memory is
//! reconstructed per request from the most recent stored messages.

use super::{MessageRole, StoredMessage};

/// Maximum number of stored messages fetched to build model context.
pub const CONTEXT_WINDOW: usize = 10;

/// One prior turn as presented to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextTurn {
    /// Who authored the turn.
    pub role: MessageRole,
    /// The turn text.
    pub content: String,
}

/// The bounded history sent alongside the current message.
///
/// Built from the newest [`CONTEXT_WINDOW`] messages of a conversation in
/// chronological order. The final row is dropped: it is the just-persisted
/// current user turn, which the caller sends separately. Invariant: the model
/// never sees the current turn twice.
#[derive(Debug, Clone, Default)]
pub struct ModelContext {
    turns: Vec<ContextTurn>,
}

impl ModelContext {
    /// Builds context from stored history ordered oldest-first.
    ///
    /// `history` must be the newest rows of the conversation in chronological
    /// order, with the current user turn as its final element.
    pub fn from_history(history: &[StoredMessage]) -> Self {
        let prior = match history.split_last() {
            Some((_current, prior)) => prior,
            None => return Self::default(),
        };
        let turns = prior
            .iter()
            .map(|m| ContextTurn {
                role: m.role,
                content: m.content.clone(),
            })
            .collect();
        Self { turns }
    }

    /// The prior turns, oldest first.
    pub fn turns(&self) -> &[ContextTurn] {
        &self.turns
    }

    /// Number of prior turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True when there is no prior history.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
