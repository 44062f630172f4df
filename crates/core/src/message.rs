//! Turn and History domain types.
//!
//! These are the value objects that flow through the whole turn pipeline:
//! user speaks → transcript becomes a user Turn → the model's answer becomes
//! an assistant Turn → both are appended to the session History.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a turn's author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person asking questions
    User,
    /// The assistant's reply
    Assistant,
    /// Instructions sent to the language model; never stored in History
    System,
}

/// A single role-tagged message. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Unique turn ID
    pub id: String,

    /// Who authored this turn
    pub role: Role,

    /// The text content (may mix languages and scripts)
    pub content: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create a new assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Create a system instruction turn (for model requests only).
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }
}

/// The ordered, append-only sequence of turns for one session.
///
/// Turns are never edited or removed; readers get a shared slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    /// Session this history belongs to
    pub id: SessionId,

    turns: Vec<Turn>,

    /// When the session started
    pub created_at: DateTime<Utc>,

    /// When the last turn was appended
    pub updated_at: DateTime<Utc>,
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            turns: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a turn.
    pub fn push(&mut self, turn: Turn) {
        self.updated_at = Utc::now();
        self.turns.push(turn);
    }

    /// All turns in conversational order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The trailing `n` turns (fewer if the history is shorter).
    pub fn recent(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Turn> for History {
    fn from_iter<I: IntoIterator<Item = Turn>>(iter: I) -> Self {
        let mut history = Self::new();
        for turn in iter {
            history.push(turn);
        }
        history
    }
}
