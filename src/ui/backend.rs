use std::sync::Arc;

use shortgen::{
    app::{ControllerConfig, SubmissionJobManager},
    domain::{SubmissionError, SubmissionPayload},
    infra::{
        env::read_flag_from_env,
        webhook::{HttpWebhookClient, WebhookClient},
    },
};

use super::{DEBUG_PROMPT_LOG_ENV, UNCONFIGURED_WEBHOOK_NOTICE};

pub(super) struct FormBackend {
    pub(super) job_manager: Arc<SubmissionJobManager>,
    pub(super) controller_config: ControllerConfig,
    pub(super) endpoint: String,
    pub(super) debug_prompt_log: bool,
    pub(super) startup_notice: Option<String>,
}

pub(super) fn build_form_backend() -> FormBackend {
    let mut notices = Vec::new();

    let controller_config = ControllerConfig::from_env().unwrap_or_else(|error| {
        notices.push(format!(
            "Using the default reset delay: {}",
            error.user_message()
        ));
        ControllerConfig::default()
    });
    let debug_prompt_log = read_flag_from_env(DEBUG_PROMPT_LOG_ENV);

    let client = match HttpWebhookClient::from_env() {
        Ok(client) => client,
        Err(error) => {
            notices.push(format!("Webhook is unavailable: {}", error.user_message()));
            return build_unconfigured_backend(controller_config, debug_prompt_log, notices);
        }
    };
    let endpoint = client.endpoint().to_string();

    let manager = match SubmissionJobManager::new(Arc::new(client)) {
        Ok(manager) => manager,
        Err(error) => {
            notices.push(format!(
                "Failed to start webhook worker: {}",
                error.user_message()
            ));
            return build_unconfigured_backend(controller_config, debug_prompt_log, notices);
        }
    };

    FormBackend {
        job_manager: Arc::new(manager),
        controller_config,
        endpoint,
        debug_prompt_log,
        startup_notice: (!notices.is_empty()).then(|| notices.join(" ")),
    }
}

fn build_unconfigured_backend(
    controller_config: ControllerConfig,
    debug_prompt_log: bool,
    mut notices: Vec<String>,
) -> FormBackend {
    let manager = SubmissionJobManager::new(Arc::new(UnconfiguredWebhookClient))
        .expect("fallback webhook worker should start");

    notices.push(UNCONFIGURED_WEBHOOK_NOTICE.to_string());

    FormBackend {
        job_manager: Arc::new(manager),
        controller_config,
        endpoint: UnconfiguredWebhookClient.endpoint().to_string(),
        debug_prompt_log,
        startup_notice: Some(notices.join(" ")),
    }
}

struct UnconfiguredWebhookClient;

impl WebhookClient for UnconfiguredWebhookClient {
    fn endpoint(&self) -> &str {
        "unconfigured"
    }

    fn submit(&self, _payload: &SubmissionPayload) -> Result<(), SubmissionError> {
        Err(SubmissionError::unknown(UNCONFIGURED_WEBHOOK_NOTICE))
    }

    fn probe(&self) -> Result<(), SubmissionError> {
        Err(SubmissionError::unknown(UNCONFIGURED_WEBHOOK_NOTICE))
    }
}
