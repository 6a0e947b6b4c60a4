//! Client configuration

use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_mins(1);

/// Configuration for the tutoring client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorConfig {
    /// Base URL of the tutoring backend (without `/ask`)
    pub backend_url: String,
    /// Upper bound on one exchange; a timeout is a transport failure
    pub request_timeout: Duration,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl TutorConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("TUTOR_BACKEND_URL").ok(),
            std::env::var("TUTOR_REQUEST_TIMEOUT_SECS").ok(),
        )
    }

    fn from_vars(backend_url: Option<String>, timeout_secs: Option<String>) -> Self {
        let backend_url = backend_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        let request_timeout = timeout_secs
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs);

        Self {
            backend_url,
            request_timeout,
        }
    }
}
