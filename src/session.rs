//! Tutoring session
//!
//! [`SessionController`] owns the identity, level, transcript and request
//! state of one session. [`SessionRuntime`] drives a controller from a tokio
//! task so a UI can keep submitting intents while a request is in flight.

mod controller;
mod runtime;

#[cfg(test)]
pub mod testing;

pub use controller::{ExchangeOutcome, SessionController};
pub use runtime::{Intent, SessionClosed, SessionHandle, SessionRuntime, SessionSnapshot, SessionUpdate};

use crate::level::InvalidLevel;
use crate::state_machine::TransitionError;
use thiserror::Error;

/// Errors reported synchronously to the caller of a session intent.
///
/// Backend failures never show up here; they become transcript entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    InvalidLevel(#[from] InvalidLevel),
    #[error("Message is empty")]
    EmptyInput,
    #[error("A request is already in flight")]
    RequestAlreadyInFlight,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

impl From<TransitionError> for SessionError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::EmptyInput => SessionError::EmptyInput,
            TransitionError::RequestAlreadyInFlight => SessionError::RequestAlreadyInFlight,
            TransitionError::InvalidTransition(msg) => SessionError::InvalidTransition(msg),
        }
    }
}
