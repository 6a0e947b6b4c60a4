//! Backend error types

use thiserror::Error;

/// Shown when neither the server detail nor the status text is usable
pub const GENERIC_FAILURE: &str = "Erreur serveur";

/// Backend error with classification
///
/// `message` is the student-facing text; it ends up after the error prefix
/// in the transcript.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
    /// HTTP status when the server answered
    pub status: Option<u16>,
}

impl BackendError {
    #[must_use]
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Transport, message)
    }

    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Timeout, message)
    }

    #[must_use]
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Server, message)
    }

    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::MalformedResponse, message)
    }

    /// Build the error for a non-success response.
    ///
    /// Precedence: the `detail` string of a JSON body, then the status
    /// reason phrase, then [`GENERIC_FAILURE`].
    #[must_use]
    pub fn from_failed_response(status: u16, reason: Option<&str>, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_owned))
            .filter(|d| !d.trim().is_empty());

        let message = detail
            .or_else(|| reason.filter(|r| !r.is_empty()).map(str::to_owned))
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());

        Self::server(message).with_status(status)
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// Connection refused, DNS, broken body stream
    Transport,
    /// No response within the configured timeout
    Timeout,
    /// Non-success status code
    Server,
    /// Success status but the body is not a valid answer
    MalformedResponse,
}

impl BackendErrorKind {
    /// True when the server never produced a response
    #[must_use]
    pub fn is_transport(self) -> bool {
        matches!(self, Self::Transport | Self::Timeout)
    }
}
