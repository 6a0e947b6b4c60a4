//! Mock backends for testing
//!
//! These mocks enable session testing without real I/O.

use crate::backend::{AskRequest, AskResponse, BackendError, TutorBackend};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

// ============================================================================
// Mock Backend
// ============================================================================

/// Mock backend that returns queued responses
pub struct MockBackend {
    responses: Mutex<VecDeque<Result<AskResponse, BackendError>>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<AskRequest>>,
}

impl MockBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful answer
    pub fn queue_answer(&self, answer: impl Into<String>) {
        self.queue_response(AskResponse::answer(answer));
    }

    pub fn queue_response(&self, response: AskResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: BackendError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    #[must_use]
    pub fn recorded_requests(&self) -> Vec<AskRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<AskResponse, BackendError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::transport("No mock response queued")))
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TutorBackend for MockBackend {
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        self.next_response()
    }
}

// ============================================================================
// Gated Mock Backend (for in-flight testing)
// ============================================================================

/// Mock backend that holds every request until the test releases it
pub struct GatedMockBackend {
    inner: MockBackend,
    gate: Arc<Notify>,
    /// Notified when a request arrives
    pub request_started: Arc<Notify>,
}

impl GatedMockBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: MockBackend::new(),
            gate: Arc::new(Notify::new()),
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_answer(&self, answer: impl Into<String>) {
        self.inner.queue_answer(answer);
    }

    pub fn queue_error(&self, error: BackendError) {
        self.inner.queue_error(error);
    }

    /// Let one held request complete
    pub fn release(&self) {
        self.gate.notify_one();
    }

    #[must_use]
    pub fn recorded_requests(&self) -> Vec<AskRequest> {
        self.inner.recorded_requests()
    }
}

impl Default for GatedMockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TutorBackend for GatedMockBackend {
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, BackendError> {
        self.inner.requests.lock().unwrap().push(request.clone());
        self.request_started.notify_one();
        self.gate.notified().await;
        self.inner.next_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::SessionId;
    use crate::level::HelpLevel;
    use crate::transcript::Turn;
    use std::time::Duration;

    fn request() -> AskRequest {
        AskRequest::new(&SessionId::generate(), HelpLevel::Method, &[Turn::student("x")])
    }

    #[tokio::test]
    async fn test_mock_backend() {
        let mock = MockBackend::new();
        mock.queue_answer("Hello");

        let response = mock.ask(&request()).await.unwrap();
        assert_eq!(response.answer, "Hello");

        // Second call should fail (no more responses)
        assert!(mock.ask(&request()).await.is_err());
        assert_eq!(mock.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_gated_backend_waits_for_release() {
        let mock = Arc::new(GatedMockBackend::new());
        mock.queue_answer("Hello");

        let task = {
            let mock = mock.clone();
            tokio::spawn(async move { mock.ask(&request()).await })
        };
        mock.request_started.notified().await;

        // Still held
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!task.is_finished());

        mock.release();
        let response = task.await.unwrap().unwrap();
        assert_eq!(response.answer, "Hello");
    }
}
