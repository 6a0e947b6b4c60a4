//! Tutoring backend abstraction
//!
//! The backend is stateless per request: every call carries the full
//! transcript and the active help level.

mod error;
mod http;
mod types;

pub use error::{BackendError, BackendErrorKind, GENERIC_FAILURE};
pub use http::HttpBackend;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for tutoring backends
#[async_trait]
pub trait TutorBackend: Send + Sync {
    /// Ask the tutor for the next hint
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, BackendError>;
}

#[async_trait]
impl<T: TutorBackend + ?Sized> TutorBackend for Arc<T> {
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, BackendError> {
        (**self).ask(request).await
    }
}

/// Logging wrapper for tutoring backends
pub struct LoggingBackend<B> {
    inner: B,
}

impl<B: TutorBackend> LoggingBackend<B> {
    #[must_use]
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<B: TutorBackend> TutorBackend for LoggingBackend<B> {
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, BackendError> {
        let start = std::time::Instant::now();
        let result = self.inner.ask(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    session_id = %request.user_id,
                    level = request.level,
                    messages = request.messages.len(),
                    duration_ms = %duration.as_millis(),
                    tokens_in = ?response.tokens_in,
                    tokens_out = ?response.tokens_out,
                    model = ?response.model,
                    "Tutor request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    session_id = %request.user_id,
                    level = request.level,
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    status = ?e.status,
                    error = %e.message,
                    "Tutor request failed"
                );
            }
        }

        result
    }
}
