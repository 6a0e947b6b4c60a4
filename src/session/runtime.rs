//! Session runtime task
//!
//! Owns a [`SessionController`] inside a tokio task. Intents arrive over an
//! mpsc channel, the backend call runs in a spawned task, and every change
//! is broadcast to subscribers. The controller is only touched from the
//! runtime loop, so the busy check and the transition to `Pending` happen
//! without any suspension in between.

use super::{SessionController, SessionError};
use crate::backend::{AskRequest, AskResponse, BackendError, TutorBackend, GENERIC_FAILURE};
use crate::identity::SessionId;
use crate::level::HelpLevel;
use crate::transcript::Turn;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

const INTENT_CHANNEL_CAPACITY: usize = 32;
const UPDATE_CHANNEL_CAPACITY: usize = 128;

/// UI-triggered intents
#[derive(Debug)]
pub enum Intent {
    /// Put `text` in the input buffer and send it
    SendMessage { text: String },
    /// Send the input buffer again, e.g. after a busy rejection
    SubmitDraft,
    ChangeLevel { level: u8 },
    Snapshot { reply: oneshot::Sender<SessionSnapshot> },
}

/// Changes pushed to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    TurnAppended { turn: Turn },
    BusyChanged { busy: bool },
    LevelChanged { level: HelpLevel },
    /// Intent refused by local validation; nothing changed
    Rejected { error: SessionError },
}

/// Point-in-time view of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub level: HelpLevel,
    pub busy: bool,
    /// Text left in the input buffer by a rejected send
    pub draft: String,
    pub transcript: Vec<Turn>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Session runtime stopped")]
pub struct SessionClosed;

/// UI-side handle to a running session
#[derive(Clone)]
pub struct SessionHandle {
    intent_tx: mpsc::Sender<Intent>,
    update_tx: broadcast::Sender<SessionUpdate>,
}

impl SessionHandle {
    /// # Errors
    ///
    /// [`SessionClosed`] when the runtime has stopped.
    pub async fn send_message(&self, text: impl Into<String>) -> Result<(), SessionClosed> {
        self.submit(Intent::SendMessage { text: text.into() }).await
    }

    /// # Errors
    ///
    /// [`SessionClosed`] when the runtime has stopped.
    pub async fn submit_draft(&self) -> Result<(), SessionClosed> {
        self.submit(Intent::SubmitDraft).await
    }

    /// # Errors
    ///
    /// [`SessionClosed`] when the runtime has stopped.
    pub async fn change_level(&self, level: u8) -> Result<(), SessionClosed> {
        self.submit(Intent::ChangeLevel { level }).await
    }

    /// # Errors
    ///
    /// [`SessionClosed`] when the runtime has stopped.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionClosed> {
        let (reply, rx) = oneshot::channel();
        self.submit(Intent::Snapshot { reply }).await?;
        rx.await.map_err(|_| SessionClosed)
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.update_tx.subscribe()
    }

    async fn submit(&self, intent: Intent) -> Result<(), SessionClosed> {
        self.intent_tx.send(intent).await.map_err(|_| SessionClosed)
    }
}

type InFlight = JoinHandle<Result<AskResponse, BackendError>>;

/// Drives one session until every handle is dropped
pub struct SessionRuntime<B: TutorBackend + 'static> {
    controller: SessionController<B>,
    intent_rx: mpsc::Receiver<Intent>,
    update_tx: broadcast::Sender<SessionUpdate>,
    in_flight: Option<InFlight>,
}

impl<B: TutorBackend + 'static> SessionRuntime<B> {
    #[must_use]
    pub fn new(controller: SessionController<B>) -> (Self, SessionHandle) {
        let (intent_tx, intent_rx) = mpsc::channel(INTENT_CHANNEL_CAPACITY);
        let (update_tx, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        let handle = SessionHandle {
            intent_tx,
            update_tx: update_tx.clone(),
        };
        let runtime = Self {
            controller,
            intent_rx,
            update_tx,
            in_flight: None,
        };
        (runtime, handle)
    }

    /// Spawn the runtime on the current tokio runtime
    #[must_use]
    pub fn spawn(controller: SessionController<B>) -> (SessionHandle, JoinHandle<()>) {
        let (runtime, handle) = Self::new(controller);
        (handle, tokio::spawn(runtime.run()))
    }

    pub async fn run(mut self) {
        let session_id = self.controller.session_id().clone();
        tracing::info!(session_id = %session_id, "Starting session runtime");

        let mut intents_closed = false;
        loop {
            // A pending exchange always resolves before shutdown
            if intents_closed && self.in_flight.is_none() {
                break;
            }

            tokio::select! {
                intent = self.intent_rx.recv(), if !intents_closed => match intent {
                    Some(intent) => self.handle_intent(intent),
                    None => intents_closed = true,
                },
                result = wait_in_flight(&mut self.in_flight), if self.in_flight.is_some() => {
                    self.in_flight = None;
                    self.handle_completion(result);
                }
            }
        }

        tracing::info!(session_id = %session_id, "Session runtime stopped");
    }

    fn handle_intent(&mut self, intent: Intent) {
        match intent {
            Intent::SendMessage { text } => {
                self.controller.set_draft(text);
                self.send_draft();
            }
            Intent::SubmitDraft => self.send_draft(),
            Intent::ChangeLevel { level } => match self.controller.change_level(level) {
                Ok(level) => self.publish(SessionUpdate::LevelChanged { level }),
                Err(error) => self.publish(SessionUpdate::Rejected { error }),
            },
            Intent::Snapshot { reply } => {
                let _ = reply.send(SessionSnapshot {
                    session_id: self.controller.session_id().clone(),
                    level: self.controller.current_level(),
                    busy: self.controller.is_busy(),
                    draft: self.controller.draft().to_string(),
                    transcript: self.controller.transcript(),
                });
            }
        }
    }

    fn send_draft(&mut self) {
        match self.controller.begin_send_draft() {
            Ok(request) => {
                self.publish_last_turn();
                self.publish(SessionUpdate::BusyChanged { busy: true });
                self.dispatch(request);
            }
            Err(error) => self.publish(SessionUpdate::Rejected { error }),
        }
    }

    fn dispatch(&mut self, request: AskRequest) {
        let backend = self.controller.backend();
        self.in_flight = Some(tokio::spawn(async move { backend.ask(&request).await }));
    }

    fn handle_completion(&mut self, result: Result<AskResponse, BackendError>) {
        match self.controller.complete_send(result) {
            Ok(_) => {
                self.publish_last_turn();
                self.publish(SessionUpdate::BusyChanged { busy: false });
            }
            Err(e) => {
                tracing::error!(
                    session_id = %self.controller.session_id(),
                    error = %e,
                    "Completion did not match the session state"
                );
            }
        }
    }

    fn publish_last_turn(&self) {
        if let Some(turn) = self.controller.turns().last() {
            self.publish(SessionUpdate::TurnAppended { turn: turn.clone() });
        }
    }

    fn publish(&self, update: SessionUpdate) {
        // No subscribers is fine
        let _ = self.update_tx.send(update);
    }
}

/// Await the in-flight request. A panicked request task is a failure, not a
/// stuck session.
async fn wait_in_flight(in_flight: &mut Option<InFlight>) -> Result<AskResponse, BackendError> {
    match in_flight {
        Some(handle) => handle.await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Tutor request task failed");
            Err(BackendError::transport(GENERIC_FAILURE))
        }),
        None => std::future::pending().await,
    }
}
