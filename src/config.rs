// src/config.rs
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_API_ENDPOINT: &str = "https://your-vps-server.com/api/chat";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub const ENV_CONFIG_PATH: &str = "CHATBOT_CONFIG";
pub const ENV_API_ENDPOINT: &str = "CHATBOT_API_ENDPOINT";
pub const ENV_TIMEOUT_MS: &str = "CHATBOT_TIMEOUT_MS";
pub const ENV_ENABLE_FALLBACK: &str = "CHATBOT_ENABLE_FALLBACK";
pub const ENV_API_TOKEN: &str = "CHATBOT_API_TOKEN";

/// Static widget configuration, loaded before the widget is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    pub api_endpoint: String,
    /// Milliseconds to wait for a reply before giving up.
    pub timeout: u64,
    pub enable_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub custom_headers: HashMap<String, String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT_MS,
            enable_fallback: true,
            api_token: None,
            custom_headers: HashMap::new(),
        }
    }
}

impl WidgetConfig {
    /// Convenience constructor used by hosts that only need an endpoint.
    pub fn new(api_endpoint: impl Into<String>) -> Self {
        Self {
            api_endpoint: api_endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.enable_fallback = enabled;
        self
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.insert(name.into(), value.into());
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// Load from `path` (defaults when the file is absent), then apply
    /// `CHATBOT_*` environment overrides and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("Config file {} not found; using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// Override fields from a key lookup (the process environment in `load`).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_API_ENDPOINT) {
            self.api_endpoint = endpoint;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            self.timeout = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                key: ENV_TIMEOUT_MS,
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup(ENV_ENABLE_FALLBACK) {
            self.enable_fallback = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        key: ENV_ENABLE_FALLBACK,
                        value: raw.clone(),
                    });
                }
            };
        }
        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.api_token = Some(token).filter(|t| !t.trim().is_empty());
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        self.endpoint_url()?;
        Ok(())
    }

    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.api_endpoint)
            .map_err(|_| ConfigError::InvalidEndpoint(self.api_endpoint.clone()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(ConfigError::InvalidEndpoint(self.api_endpoint.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_match_shipped_values() {
        let config = WidgetConfig::default();
        assert_eq!(config.api_endpoint, DEFAULT_API_ENDPOINT);
        assert_eq!(config.timeout, 30_000);
        assert!(config.enable_fallback);
        assert!(config.api_token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_camel_case_json() {
        let json = r#"{
            "apiEndpoint": "http://localhost:3000/api/chat",
            "timeout": 5000,
            "enableFallback": false,
            "apiToken": "abc",
            "customHeaders": { "X-Client-Id": "site-1" }
        }"#;
        let config: WidgetConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.api_endpoint, "http://localhost:3000/api/chat");
        assert_eq!(config.timeout, 5000);
        assert!(!config.enable_fallback);
        assert_eq!(config.api_token.as_deref(), Some("abc"));
        assert_eq!(config.custom_headers.get("X-Client-Id").map(String::as_str), Some("site-1"));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: WidgetConfig = serde_json::from_str(r#"{ "timeout": 100 }"#).unwrap();
        assert_eq!(config.timeout, 100);
        assert_eq!(config.api_endpoint, DEFAULT_API_ENDPOINT);
        assert!(config.enable_fallback);
    }

    #[test]
    fn overrides_apply() {
        let mut config = WidgetConfig::default();
        config
            .apply_overrides(lookup(&[
                (ENV_API_ENDPOINT, "http://127.0.0.1:9000/chat"),
                (ENV_TIMEOUT_MS, "1500"),
                (ENV_ENABLE_FALLBACK, "false"),
                (ENV_API_TOKEN, "secret"),
            ]))
            .unwrap();
        assert_eq!(config.api_endpoint, "http://127.0.0.1:9000/chat");
        assert_eq!(config.timeout, 1500);
        assert!(!config.enable_fallback);
        assert_eq!(config.api_token.as_deref(), Some("secret"));
    }

    #[test]
    fn bad_override_is_rejected() {
        let mut config = WidgetConfig::default();
        let err = config
            .apply_overrides(lookup(&[(ENV_TIMEOUT_MS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { key: ENV_TIMEOUT_MS, .. }));
    }

    #[test]
    fn validation_rejects_zero_timeout_and_bad_endpoint() {
        let config = WidgetConfig::default().with_timeout(Duration::ZERO);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTimeout)));

        let config = WidgetConfig::new("ftp://example.com/chat");
        assert!(matches!(config.validate(), Err(ConfigError::InvalidEndpoint(_))));

        let config = WidgetConfig::new("not a url");
        assert!(matches!(config.validate(), Err(ConfigError::InvalidEndpoint(_))));
    }

    #[test]
    fn oversized_timeout_saturates() {
        let config = WidgetConfig::default().with_timeout(Duration::MAX);
        assert_eq!(config.timeout, u64::MAX);
    }

    #[test]
    fn existing_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "apiEndpoint": "http://127.0.0.1:8080/chat",
                "timeout": 2500,
                "enableFallback": false
            }"#,
        )
        .unwrap();

        let config = WidgetConfig::from_file(&path).unwrap();
        assert_eq!(config.api_endpoint, "http://127.0.0.1:8080/chat");
        assert_eq!(config.timeout, 2500);
        assert!(!config.enable_fallback);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ apiEndpoint: nope").unwrap();

        let err = WidgetConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{err:?}");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = WidgetConfig::from_file("does/not/exist.json").unwrap();
        assert_eq!(config, WidgetConfig::default());
    }
}
