use reqwest::blocking::{Client, Response, multipart};
use reqwest::header::{ACCEPT, USER_AGENT};

use crate::domain::{AudioFile, SubmissionError, SubmissionPayload};
use crate::infra::env::ConfigError;

use super::{WebhookClient, WebhookConfig};

const ACCEPT_JSON: &str = "application/json";
const CLIENT_USER_AGENT: &str = concat!("shortgen/", env!("CARGO_PKG_VERSION"));

pub struct HttpWebhookClient {
    config: WebhookConfig,
    client: Client,
}

impl HttpWebhookClient {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::with_config(WebhookConfig::from_env()?)
    }

    pub fn with_config(config: WebhookConfig) -> Result<Self, ConfigError> {
        // Blocking clients default to a 30s timeout; clear it unless one is configured.
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|error| {
                ConfigError::invalid(format!("failed to create webhook HTTP client: {error}"))
            })?;
        Ok(Self { config, client })
    }

    fn post(&self, form: multipart::Form) -> Result<Response, SubmissionError> {
        self.client
            .post(self.config.endpoint().clone())
            .header(ACCEPT, ACCEPT_JSON)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .multipart(form)
            .send()
            .map_err(|error| map_transport_error(&self.config, error))
    }
}

impl WebhookClient for HttpWebhookClient {
    fn endpoint(&self) -> &str {
        self.config.endpoint().as_str()
    }

    fn submit(&self, payload: &SubmissionPayload) -> Result<(), SubmissionError> {
        let form = build_submission_form(payload)?;
        let response = self.post(form)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SubmissionError::Server {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    fn probe(&self) -> Result<(), SubmissionError> {
        let response = self.post(multipart::Form::new())?;
        let status = response.status();
        if !status.is_success() {
            return Err(SubmissionError::Server {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

pub(crate) fn build_submission_form(
    payload: &SubmissionPayload,
) -> Result<multipart::Form, SubmissionError> {
    Ok(multipart::Form::new()
        .part("cta", audio_part(&payload.cta)?)
        .part("bgm", audio_part(&payload.bgm)?)
        .text("prompt", payload.prompt.clone()))
}

fn audio_part(file: &AudioFile) -> Result<multipart::Part, SubmissionError> {
    multipart::Part::bytes(file.bytes().to_vec())
        .file_name(file.name().to_string())
        .mime_str(file.mime_type())
        .map_err(|error| {
            SubmissionError::unknown(format!(
                "'{}' has an unusable MIME type '{}': {error}",
                file.name(),
                file.mime_type()
            ))
        })
}

fn map_transport_error(config: &WebhookConfig, error: reqwest::Error) -> SubmissionError {
    if error.is_connect() {
        return SubmissionError::network(config.host_label(), error.to_string());
    }
    if error.is_timeout() {
        return SubmissionError::unknown(format!(
            "The webhook did not respond in time: {error}"
        ));
    }
    if error.is_request() {
        return SubmissionError::network(config.host_label(), error.to_string());
    }
    SubmissionError::unknown(error.to_string())
}
