//! Append-only conversation transcript

use serde::Serialize;

/// Prefix marking a tutor turn that reports a failed exchange
pub const ERROR_PREFIX: &str = "⚠️ ";

/// Who spoke a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Tutor,
}

impl Role {
    /// Role name on the wire (`user` / `assistant`)
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Role::Student => "user",
            Role::Tutor => "assistant",
        }
    }

    /// Speaker label shown to the student
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Role::Student => "Élève",
            Role::Tutor => "Tuteur",
        }
    }
}

/// One exchanged message. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    #[must_use]
    pub fn student(content: impl Into<String>) -> Self {
        Self {
            role: Role::Student,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn tutor(content: impl Into<String>) -> Self {
        Self {
            role: Role::Tutor,
            content: content.into(),
        }
    }

    /// Tutor turn carrying a visibly marked failure message
    #[must_use]
    pub fn tutor_error(message: &str) -> Self {
        Self::tutor(format!("{ERROR_PREFIX}{message}"))
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.role == Role::Tutor && self.content.starts_with(ERROR_PREFIX)
    }
}

/// Ordered log of turns. `append` is the only mutator.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Copy of the full sequence; callers cannot reach the stored turns through it
    #[must_use]
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}
