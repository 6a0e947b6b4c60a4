//! Pure state transition function
//!
//! Given the same state and event it always yields the same result and
//! performs no I/O. Single-flight is enforced here: a submit is only
//! accepted from `Idle`.

use super::{Effect, Event, RequestState};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: RequestState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    #[must_use]
    pub fn new(state: RequestState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition. The state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Message is empty")]
    EmptyInput,
    #[error("A request is already in flight")]
    RequestAlreadyInFlight,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Compute the next state and the effects to run.
///
/// # Errors
///
/// Returns a [`TransitionError`] when the event is not allowed in `state`.
/// Nothing is to be mutated in that case.
pub fn transition(
    state: &RequestState,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Busy check comes first so a blank submit while pending still
        // reports the in-flight request
        (RequestState::Pending, Event::StudentSubmit { .. }) => {
            Err(TransitionError::RequestAlreadyInFlight)
        }

        (RequestState::Idle, Event::StudentSubmit { text }) if text.trim().is_empty() => {
            Err(TransitionError::EmptyInput)
        }

        // Idle + StudentSubmit -> Pending (optimistic echo, then request)
        (RequestState::Idle, Event::StudentSubmit { text }) => {
            Ok(TransitionResult::new(RequestState::Pending)
                .with_effect(Effect::append_student(text))
                .with_effect(Effect::ClearDraft)
                .with_effect(Effect::RequestTutor))
        }

        (RequestState::Pending, Event::TutorAnswered { answer }) => {
            Ok(TransitionResult::new(RequestState::Idle).with_effect(Effect::append_tutor(answer)))
        }

        // Failures are recovered into a marked tutor turn
        (RequestState::Pending, Event::TutorFailed { message }) => {
            Ok(TransitionResult::new(RequestState::Idle)
                .with_effect(Effect::append_failure(&message)))
        }

        (RequestState::Idle, event @ (Event::TutorAnswered { .. } | Event::TutorFailed { .. })) => {
            Err(TransitionError::InvalidTransition(format!(
                "{event:?} with no request in flight"
            )))
        }
    }
}
