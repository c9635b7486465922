//! Conversation turns and the ordered transcript.
//!
//! # Examples
//!
//! ```
//! use tutor_chat::chat::message::{Role, Transcript, Turn};
//!
//! let mut transcript = Transcript::new();
//! transcript.push(Turn::user("What is a heap?"));
//! assert_eq!(transcript.len(), 1);
//! assert_eq!(transcript.last().map(|t| t.role), Some(Role::User));
//! ```

use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User input.
    User,
    /// Tutor (model) output.
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One unit of conversation.
///
/// Serializes as `{"role": ..., "content": ...}`, which is also the wire
/// shape of an entry in the request's `messages` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced this turn.
    pub role: Role,
    /// The turn text. Assistant turns grow while their response streams.
    pub content: String,
}

impl Turn {
    /// Create a turn with the given role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Ordered conversation history.
///
/// Append-only, except that the content of the last turn may be replaced
/// while its response is streaming. Mutation goes through the crate's
/// conversation state machine; the public surface is read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// All turns in conversation order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The most recent turn, if any.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the transcript has no turns.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Append a turn, returning its index.
    pub fn push(&mut self, turn: Turn) -> usize {
        self.turns.push(turn);
        self.turns.len() - 1
    }

    /// Replace the content of the last turn if it is at `index`.
    ///
    /// Returns `false` (and changes nothing) when `index` is not the last turn.
    pub(crate) fn replace_last(&mut self, index: usize, content: &str) -> bool {
        if index + 1 != self.turns.len() {
            return false;
        }
        match self.turns.last_mut() {
            Some(turn) => {
                turn.content.clear();
                turn.content.push_str(content);
                true
            }
            None => false,
        }
    }
}
