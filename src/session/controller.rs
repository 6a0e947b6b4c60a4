//! Session controller

use super::SessionError;
use crate::backend::{AskRequest, AskResponse, BackendError, TutorBackend};
use crate::identity::SessionId;
use crate::level::{HelpLevel, LevelSelector};
use crate::state_machine::{transition, Effect, Event, RequestState, TransitionError};
use crate::transcript::{Transcript, Turn};
use std::sync::Arc;

/// Shown when the caller gave up on an exchange before the tutor answered
pub const INTERRUPTED: &str = "Requête interrompue";

/// How an accepted exchange ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    Answered { answer: String },
    /// Recovered failure; the reason is already in the transcript
    Failed { reason: String },
}

/// Single owner of one tutoring session's state
pub struct SessionController<B> {
    session_id: SessionId,
    levels: LevelSelector,
    transcript: Transcript,
    state: RequestState,
    draft: String,
    backend: Arc<B>,
}

impl<B: TutorBackend> SessionController<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self::with_backend(Arc::new(backend))
    }

    #[must_use]
    pub fn with_backend(backend: Arc<B>) -> Self {
        let session_id = SessionId::generate();
        tracing::debug!(session_id = %session_id, "Session started");
        Self {
            session_id,
            levels: LevelSelector::new(),
            transcript: Transcript::new(),
            state: RequestState::Idle,
            draft: String::new(),
            backend,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    #[must_use]
    pub fn current_level(&self) -> HelpLevel {
        self.levels.current_level()
    }

    /// Select a level by number.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidLevel`] for values outside 1..=3; nothing changes.
    pub fn change_level(&mut self, n: u8) -> Result<HelpLevel, SessionError> {
        let level = self.levels.set_level(n).inspect_err(|e| {
            tracing::debug!(session_id = %self.session_id, error = %e, "Level rejected");
        })?;
        tracing::debug!(session_id = %self.session_id, level = level.number(), "Level changed");
        Ok(level)
    }

    pub fn select_level(&mut self, level: HelpLevel) {
        self.levels.select(level);
    }

    /// Copy of the transcript
    #[must_use]
    pub fn transcript(&self) -> Vec<Turn> {
        self.transcript.snapshot()
    }

    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        self.transcript.turns()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.state.is_pending()
    }

    #[must_use]
    pub fn request_state(&self) -> RequestState {
        self.state
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    #[must_use]
    pub fn backend(&self) -> Arc<B> {
        Arc::clone(&self.backend)
    }

    /// Guard, echo and build the outbound request.
    ///
    /// No suspension point between the busy check and entering `Pending`.
    ///
    /// # Errors
    ///
    /// [`SessionError::RequestAlreadyInFlight`] while pending and
    /// [`SessionError::EmptyInput`] for blank text. Nothing is appended.
    pub fn begin_send(&mut self, text: &str) -> Result<AskRequest, SessionError> {
        let request = self
            .apply(Event::StudentSubmit {
                text: text.to_string(),
            })
            .inspect_err(|e| {
                tracing::debug!(session_id = %self.session_id, error = %e, "Send rejected");
            })?;

        request.ok_or_else(|| SessionError::InvalidTransition("submit produced no request".into()))
    }

    /// Apply the backend result of the in-flight exchange.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidTransition`] when nothing is in flight.
    pub fn complete_send(
        &mut self,
        result: Result<AskResponse, BackendError>,
    ) -> Result<ExchangeOutcome, SessionError> {
        let (event, outcome) = match result {
            Ok(response) => (
                Event::TutorAnswered {
                    answer: response.answer.clone(),
                },
                ExchangeOutcome::Answered {
                    answer: response.answer,
                },
            ),
            Err(e) => {
                tracing::warn!(
                    session_id = %self.session_id,
                    kind = ?e.kind,
                    status = ?e.status,
                    error = %e.message,
                    "Exchange failed"
                );
                (
                    Event::TutorFailed {
                        message: e.message.clone(),
                    },
                    ExchangeOutcome::Failed { reason: e.message },
                )
            }
        };

        self.apply(event)?;
        Ok(outcome)
    }

    /// [`begin_send`](Self::begin_send) with the input buffer's content
    ///
    /// # Errors
    ///
    /// Same as [`begin_send`](Self::begin_send). A rejected draft is kept.
    pub fn begin_send_draft(&mut self) -> Result<AskRequest, SessionError> {
        let text = self.draft.clone();
        self.begin_send(&text)
    }

    /// Send a message and wait for the tutor's reply.
    ///
    /// Backend failures are recovered into the transcript and reported as
    /// [`ExchangeOutcome::Failed`]. Dropping the returned future before it
    /// resolves records an [`INTERRUPTED`] failure turn and leaves the
    /// session idle.
    ///
    /// # Errors
    ///
    /// Local validation errors, as for [`begin_send`](Self::begin_send).
    pub async fn send_message(&mut self, text: &str) -> Result<ExchangeOutcome, SessionError> {
        let request = self.begin_send(text)?;
        self.exchange(request).await
    }

    /// Send whatever is in the input buffer
    ///
    /// # Errors
    ///
    /// Same as [`send_message`](Self::send_message).
    pub async fn submit_draft(&mut self) -> Result<ExchangeOutcome, SessionError> {
        let request = self.begin_send_draft()?;
        self.exchange(request).await
    }

    async fn exchange(&mut self, request: AskRequest) -> Result<ExchangeOutcome, SessionError> {
        let backend = self.backend();
        let pending = PendingExchange {
            session: Some(self),
        };
        let result = backend.ask(&request).await;
        pending.finish(result)
    }

    /// Run one event through the state machine and execute its effects.
    /// Returns the outbound request when the effects asked for one.
    fn apply(&mut self, event: Event) -> Result<Option<AskRequest>, TransitionError> {
        let result = transition(&self.state, event)?;
        self.state = result.new_state;

        let mut request = None;
        for effect in result.effects {
            match effect {
                Effect::AppendTurn(turn) => self.transcript.append(turn),
                Effect::ClearDraft => self.draft.clear(),
                Effect::RequestTutor => {
                    request = Some(AskRequest::new(
                        &self.session_id,
                        self.levels.current_level(),
                        self.transcript.turns(),
                    ));
                }
            }
        }
        Ok(request)
    }
}

/// Completes the exchange with an [`INTERRUPTED`] failure when dropped
/// before [`finish`](Self::finish) runs.
struct PendingExchange<'a, B: TutorBackend> {
    session: Option<&'a mut SessionController<B>>,
}

impl<B: TutorBackend> PendingExchange<'_, B> {
    fn finish(
        mut self,
        result: Result<AskResponse, BackendError>,
    ) -> Result<ExchangeOutcome, SessionError> {
        match self.session.take() {
            Some(session) => session.complete_send(result),
            None => Err(SessionError::InvalidTransition("exchange already completed".into())),
        }
    }
}

impl<B: TutorBackend> Drop for PendingExchange<'_, B> {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        tracing::warn!(
            session_id = %session.session_id,
            "Exchange dropped before the tutor answered"
        );
        if let Err(e) = session.complete_send(Err(BackendError::transport(INTERRUPTED))) {
            tracing::error!(
                session_id = %session.session_id,
                error = %e,
                "Could not close the dropped exchange"
            );
        }
    }
}
