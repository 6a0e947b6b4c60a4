//! HTTP tutoring backend

use super::types::{AskRequest, AskResponse, HealthResponse};
use super::{BackendError, TutorBackend, GENERIC_FAILURE};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Backend reached over HTTP (`POST {base}/ask`)
pub struct HttpBackend {
    client: Client,
    ask_url: String,
    health_url: String,
}

impl HttpBackend {
    /// Build a client for `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Fails when the TLS backend or the client cannot be initialised.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let base = base_url.trim_end_matches('/');
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            ask_url: format!("{base}/ask"),
            health_url: format!("{base}/health"),
        })
    }

    /// Probe `GET {base}/health`.
    ///
    /// A non-success status reads as unhealthy.
    ///
    /// # Errors
    ///
    /// Transport failures, and a success body that is not `{"ok": bool}`.
    pub async fn health(&self) -> Result<bool, BackendError> {
        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(|e| classify_send_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Ok(false);
        }

        let health: HealthResponse = response
            .json()
            .await
            .map_err(|e| BackendError::malformed(format!("Invalid health body: {e}")))?;
        Ok(health.ok)
    }
}

fn classify_send_error(e: &reqwest::Error) -> BackendError {
    if e.is_timeout() {
        tracing::warn!(error = %e, "Tutor request timed out");
        BackendError::timeout("Délai d'attente dépassé")
    } else if e.is_connect() {
        tracing::warn!(error = %e, "Tutor backend unreachable");
        BackendError::transport("Serveur injoignable")
    } else {
        tracing::warn!(error = %e, "Tutor request failed");
        BackendError::transport(GENERIC_FAILURE)
    }
}

/// Status text as sent by the server, falling back to the canonical phrase.
///
/// hyper only records the phrase when it differs from the canonical one.
fn reason_phrase(response: &reqwest::Response) -> Option<String> {
    response
        .extensions()
        .get::<hyper::ext::ReasonPhrase>()
        .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned())
        .or_else(|| response.status().canonical_reason().map(str::to_owned))
}

#[async_trait]
impl TutorBackend for HttpBackend {
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, BackendError> {
        let response = self
            .client
            .post(&self.ask_url)
            .json(request)
            .send()
            .await
            .map_err(|e| classify_send_error(&e))?;

        let status = response.status();
        let reason = reason_phrase(&response);
        let body = response.text().await.map_err(|e| classify_send_error(&e))?;

        if !status.is_success() {
            return Err(BackendError::from_failed_response(
                status.as_u16(),
                reason.as_deref(),
                &body,
            ));
        }

        serde_json::from_str::<AskResponse>(&body).map_err(|e| {
            tracing::warn!(error = %e, body = %body, "Unparseable tutor answer");
            BackendError::malformed(GENERIC_FAILURE).with_status(status.as_u16())
        })
    }
}
