// src/message.rs
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::services::session_manager::SessionId;

/// User input that is non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserText(String);

impl UserText {
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for UserText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Body POSTed to the answering endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingRequest {
    pub message: String,
    pub timestamp: String,
    pub session_id: String,
}

impl OutgoingRequest {
    pub fn new(text: &UserText, session_id: &SessionId) -> Self {
        Self {
            message: text.as_str().to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            session_id: session_id.as_str().to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Bot,
}

/// Where a bot message came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyOrigin {
    Remote,
    Fallback,
    Apology,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<ReplyOrigin>,
}

impl LogEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: Utc::now(),
            origin: None,
        }
    }

    pub fn bot(content: impl Into<String>, origin: ReplyOrigin) -> Self {
        Self {
            role: MessageRole::Bot,
            content: content.into(),
            timestamp: Utc::now(),
            origin: Some(origin),
        }
    }
}

/// Body of `POST /widget/send`.
#[derive(Deserialize)]
pub struct SendRequest {
    pub message: String,
}
