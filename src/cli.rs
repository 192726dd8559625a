use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use serde::Serialize;
use shortgen::{
    app::{ControllerConfig, FormController, IntakeOutcome, SessionState},
    domain::{ProbeState, Slot, SubmissionState},
    infra::{
        audio::{AudioLoadError, load_audio_file},
        env::ConfigError,
        webhook::{HttpWebhookClient, WebhookClient, WebhookConfig},
    },
};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "shortgen", version, about = "YouTube Shorts generator form")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Open the submission form window (default).
    Window,
    /// Submit one request without the window and print the resulting session as JSON.
    Submit {
        #[arg(long)]
        cta: PathBuf,
        #[arg(long)]
        bgm: PathBuf,
        #[arg(long)]
        prompt: String,
        /// Overrides SHORTGEN_WEBHOOK_URL.
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Send an empty request to the webhook and report whether it answered.
    Probe {
        #[arg(long)]
        endpoint: Option<String>,
    },
}

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    AudioLoad(#[from] AudioLoadError),
    #[error("failed to encode session snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    pub(crate) fn user_message(&self) -> String {
        match self {
            Self::Config(error) => error.user_message(),
            Self::AudioLoad(error) => error.user_message(),
            Self::Encode(error) => error.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SlotIntake {
    slot: Slot,
    #[serde(flatten)]
    outcome: IntakeOutcome,
}

#[derive(Debug, Serialize)]
struct CliReport<'a> {
    endpoint: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    intake: Vec<SlotIntake>,
    session: &'a SessionState,
}

pub(crate) fn build_client(endpoint: Option<&str>) -> Result<HttpWebhookClient, CliError> {
    let config = WebhookConfig::from_env()?;
    let config = match endpoint {
        Some(endpoint) => config.with_endpoint(endpoint)?,
        None => config,
    };
    Ok(HttpWebhookClient::with_config(config)?)
}

/// Returns whether the webhook accepted the submission.
pub(crate) fn run_submit(
    client: &dyn WebhookClient,
    cta: PathBuf,
    bgm: PathBuf,
    prompt: &str,
) -> Result<(bool, String), CliError> {
    let mut controller = FormController::new(ControllerConfig::from_env()?);
    let mut intake = Vec::with_capacity(Slot::ALL.len());

    for (slot, path) in [(Slot::Cta, cta), (Slot::Bgm, bgm)] {
        let file = load_audio_file(&path)?;
        let outcome = controller.pick_file(slot, Some(file));
        if let IntakeOutcome::Ignored { reason } = outcome {
            warn!(slot = slot.field_name(), ?reason, path = %path.display(), "file not attached");
        }
        intake.push(SlotIntake { slot, outcome });
    }

    if !controller.edit_prompt(prompt) {
        warn!(
            chars = prompt.chars().count(),
            "prompt exceeds the length limit and was not accepted"
        );
    }

    controller.submit_with(client, Instant::now());
    let session = controller.snapshot();
    let succeeded = matches!(session.submission, SubmissionState::Succeeded);
    info!(succeeded, endpoint = client.endpoint(), "submission finished");

    let report = CliReport {
        endpoint: client.endpoint(),
        intake,
        session: &session,
    };
    Ok((succeeded, serde_json::to_string_pretty(&report)?))
}

/// Returns whether the webhook answered the probe.
pub(crate) fn run_probe(client: &dyn WebhookClient) -> Result<(bool, String), CliError> {
    let mut controller = FormController::default();
    controller.probe_with(client);
    let session = controller.snapshot();
    let reachable = session.probe == ProbeState::Reachable;

    let report = CliReport {
        endpoint: client.endpoint(),
        intake: Vec::new(),
        session: &session,
    };
    Ok((reachable, serde_json::to_string_pretty(&report)?))
}
