use std::time::Duration;

use reqwest::Url;

use crate::infra::env::{ConfigError, read_env_var, read_timeout_from_env};

pub const DEFAULT_WEBHOOK_URL: &str =
    "http://localhost:8080/webhook/e9402225-9ac3-4f33-bd00-fe4c40868234";
const ENV_WEBHOOK_URL: &str = "SHORTGEN_WEBHOOK_URL";
const ENV_WEBHOOK_TIMEOUT_SECS: &str = "SHORTGEN_WEBHOOK_TIMEOUT_SECS";

/// Where submissions go. `timeout: None` lets a request wait indefinitely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    endpoint: Url,
    timeout: Option<Duration>,
}

impl WebhookConfig {
    pub fn new(endpoint_url: &str, timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let trimmed = endpoint_url.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::invalid("webhook endpoint URL must not be empty"));
        }

        let endpoint = Url::parse(trimmed).map_err(|error| ConfigError::InvalidEndpoint {
            url: trimmed.to_string(),
            message: error.to_string(),
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") || endpoint.host_str().is_none() {
            return Err(ConfigError::InvalidEndpoint {
                url: trimmed.to_string(),
                message: "expected an http(s) URL with a host".to_string(),
            });
        }

        Ok(Self { endpoint, timeout })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint_url =
            read_env_var(ENV_WEBHOOK_URL)?.unwrap_or_else(|| DEFAULT_WEBHOOK_URL.to_string());
        let timeout = read_timeout_from_env(ENV_WEBHOOK_TIMEOUT_SECS)?;
        Self::new(&endpoint_url, timeout)
    }

    pub fn with_endpoint(mut self, endpoint_url: &str) -> Result<Self, ConfigError> {
        self.endpoint = Self::new(endpoint_url, self.timeout)?.endpoint;
        Ok(self)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// `host[:port]` as shown in connectivity guidance.
    pub fn host_label(&self) -> String {
        let host = self.endpoint.host_str().unwrap_or_default();
        match self.endpoint.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_WEBHOOK_URL)
                .expect("default webhook URL literal must parse"),
            timeout: None,
        }
    }
}
