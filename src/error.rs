// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Why a single dispatch to the answering endpoint did not produce a reply.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("network failure: {0}")]
    NetworkFailure(String),

    #[error("no reply within {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("endpoint answered with HTTP status {status}")]
    HttpError { status: u16 },

    #[error("malformed reply: {0}")]
    MalformedReply(String),
}

impl DispatchError {
    /// Stable label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::NetworkFailure(_) => "network_failure",
            DispatchError::Timeout { .. } => "timeout",
            DispatchError::HttpError { .. } => "http_error",
            DispatchError::MalformedReply(_) => "malformed_reply",
        }
    }
}

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        DispatchError::NetworkFailure(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid api endpoint '{0}'")]
    InvalidEndpoint(String),

    #[error("timeout must be a positive number of milliseconds")]
    InvalidTimeout,

    #[error("invalid value for {key}: '{value}'")]
    InvalidEnv { key: &'static str, value: String },

    #[error("invalid header '{0}'")]
    InvalidHeader(String),

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Errors surfaced by the control routes.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("widget has been destroyed")]
    Destroyed,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Destroyed => StatusCode::GONE,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
