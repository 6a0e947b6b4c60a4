//! Wire types for the `/ask` endpoint

use crate::identity::SessionId;
use crate::level::HelpLevel;
use crate::transcript::Turn;
use serde::{Deserialize, Serialize};

/// Outbound request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub user_id: String,
    pub level: u8,
    pub messages: Vec<WireMessage>,
}

impl AskRequest {
    #[must_use]
    pub fn new(session_id: &SessionId, level: HelpLevel, turns: &[Turn]) -> Self {
        Self {
            user_id: session_id.as_str().to_string(),
            level: level.number(),
            messages: turns.iter().map(WireMessage::from).collect(),
        }
    }
}

/// Transcript turn as the backend sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    /// `user` or `assistant`
    pub role: String,
    pub content: String,
}

impl From<&Turn> for WireMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role().wire_name().to_string(),
            content: turn.content().to_string(),
        }
    }
}

/// Success body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default)]
    pub tokens_in: Option<u64>,
    #[serde(default)]
    pub tokens_out: Option<u64>,
    #[serde(default)]
    pub model: Option<String>,
}

impl AskResponse {
    #[must_use]
    pub fn answer(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            tokens_in: None,
            tokens_out: None,
            model: None,
        }
    }
}

/// `/health` body
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct HealthResponse {
    pub ok: bool,
}
