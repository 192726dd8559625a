use serde::Serialize;

use super::{AudioFile, SubmissionError};

pub const SUCCESS_BANNER_MESSAGE: &str = "Your YouTube Short is being generated! Check back soon.";
pub const PROBE_REACHABLE_MESSAGE: &str = "Connection to n8n webhook successful!";
pub const PROBE_UNREACHABLE_MESSAGE: &str =
    "Cannot connect to n8n webhook. Please check if n8n is running and CORS is enabled.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed {
        message: String,
    },
}

impl SubmissionState {
    pub fn failed(error: &SubmissionError) -> Self {
        Self::Failed {
            message: error.user_message(),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeState {
    #[default]
    NotRun,
    Testing,
    Reachable,
    Unreachable,
}

impl ProbeState {
    pub fn is_testing(self) -> bool {
        matches!(self, Self::Testing)
    }

    /// Banner text once the probe has produced a result.
    pub fn banner_message(self) -> Option<&'static str> {
        match self {
            Self::Reachable => Some(PROBE_REACHABLE_MESSAGE),
            Self::Unreachable => Some(PROBE_UNREACHABLE_MESSAGE),
            Self::NotRun | Self::Testing => None,
        }
    }
}

/// Snapshot of the inputs sent as one multipart POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub cta: AudioFile,
    pub bgm: AudioFile,
    pub prompt: String,
}
