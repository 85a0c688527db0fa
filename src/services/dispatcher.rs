// src/services/dispatcher.rs
use std::time::Duration;

use reqwest::{
    Client, Url,
    header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    config::WidgetConfig,
    error::{ConfigError, DispatchError},
    message::{OutgoingRequest, UserText},
    services::session_manager::SessionId,
};

/// Sends user text to the answering endpoint. One attempt per call, no retries.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    client: Client,
    endpoint: Url,
    timeout: Duration,
    headers: HeaderMap,
}

impl Dispatcher {
    pub fn new(config: &WidgetConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint_url()?,
            timeout: config.timeout_duration(),
            headers: build_headers(config)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn send(
        &self,
        text: &UserText,
        session_id: &SessionId,
    ) -> Result<String, DispatchError> {
        self.send_with_cancel(text, session_id, &CancellationToken::new())
            .await
    }

    /// Races the exchange against the configured timeout and `cancel`.
    /// Losing the race drops the in-flight request.
    pub async fn send_with_cancel(
        &self,
        text: &UserText,
        session_id: &SessionId,
        cancel: &CancellationToken,
    ) -> Result<String, DispatchError> {
        let request = OutgoingRequest::new(text, session_id);
        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        debug!(endpoint = %self.endpoint, session_id = %session_id, "dispatching message");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                Err(DispatchError::NetworkFailure("request aborted".to_string()))
            }
            _ = tokio::time::sleep(self.timeout) => Err(DispatchError::Timeout { timeout_ms }),
            result = self.exchange(&request) => result,
        }
    }

    async fn exchange(&self, request: &OutgoingRequest) -> Result<String, DispatchError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(self.headers.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::HttpError {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        parse_reply(&body)
    }
}

/// Accepts a JSON object whose `response` is a non-empty string.
pub fn parse_reply(body: &[u8]) -> Result<String, DispatchError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| DispatchError::MalformedReply(format!("body is not JSON: {e}")))?;

    let Value::Object(mut fields) = value else {
        return Err(DispatchError::MalformedReply(
            "body is not a JSON object".to_string(),
        ));
    };

    match fields.remove("response") {
        Some(Value::String(text)) if !text.is_empty() => Ok(text),
        Some(Value::Null) | None => Err(DispatchError::MalformedReply(
            "missing `response` field".to_string(),
        )),
        Some(_) => Err(DispatchError::MalformedReply(
            "`response` is empty or not a string".to_string(),
        )),
    }
}

fn build_headers(config: &WidgetConfig) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();

    if let Some(token) = &config.api_token {
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ConfigError::InvalidHeader(AUTHORIZATION.to_string()))?;
        headers.insert(AUTHORIZATION, value);
    }

    for (name, value) in &config.custom_headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ConfigError::InvalidHeader(name.clone()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidHeader(name.clone()))?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}
