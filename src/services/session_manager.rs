// src/services/session_manager.rs
use std::{fmt, sync::OnceLock};

use chrono::Utc;
use uuid::Uuid;

const SUFFIX_LEN: usize = 9;

/// Opaque identifier correlating requests from one tab.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// `session-<epoch-ms>-<random suffix>`
    pub fn generate() -> Self {
        let random = Uuid::new_v4().simple().to_string();
        Self(format!(
            "session-{}-{}",
            Utc::now().timestamp_millis(),
            &random[..SUFFIX_LEN]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage scoped to one tab: the session id is created on first read and
/// never rewritten afterwards.
#[derive(Debug, Default)]
pub struct TabSession {
    id: OnceLock<SessionId>,
}

impl TabSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an id restored by the host.
    pub fn with_id(id: SessionId) -> Self {
        let session = Self::new();
        let _ = session.id.set(id);
        session
    }

    pub fn get_or_create(&self) -> &SessionId {
        self.id.get_or_init(|| {
            let id = SessionId::generate();
            tracing::debug!(session_id = %id, "created tab session");
            id
        })
    }

    /// The id, if one has been created yet.
    pub fn peek(&self) -> Option<&SessionId> {
        self.id.get()
    }
}
