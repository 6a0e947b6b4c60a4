//! Effects produced by state transitions

use crate::transcript::Turn;

/// Effects to be executed, in order, after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a turn to the transcript
    AppendTurn(Turn),

    /// Clear the student's input buffer
    ClearDraft,

    /// Send the current transcript to the tutor
    RequestTutor,
}

impl Effect {
    #[must_use]
    pub fn append_student(text: impl Into<String>) -> Self {
        Effect::AppendTurn(Turn::student(text))
    }

    #[must_use]
    pub fn append_tutor(answer: impl Into<String>) -> Self {
        Effect::AppendTurn(Turn::tutor(answer))
    }

    #[must_use]
    pub fn append_failure(message: &str) -> Self {
        Effect::AppendTurn(Turn::tutor_error(message))
    }
}
