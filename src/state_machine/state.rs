//! Request lifecycle state

use serde::Serialize;

/// In-flight state of the session's single exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    /// Ready for a new message
    #[default]
    Idle,

    /// Student turn appended, waiting for the tutor
    Pending,
}

impl RequestState {
    /// True while a request is in flight; the send affordance is disabled
    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(self, RequestState::Pending)
    }
}
