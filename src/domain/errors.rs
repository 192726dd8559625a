use thiserror::Error;

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all required fields";
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate video";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionErrorCategory {
    UserActionRequired,
    ServiceFailure,
    Connectivity,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("validation failed: {message}")]
    Validation { message: String },
    #[error("webhook returned HTTP {status}")]
    Server { status: u16 },
    #[error("webhook is unreachable at {host}: {message}")]
    Network { host: String, message: String },
    #[error("submission failed: {}", message.as_deref().unwrap_or("no description"))]
    Unknown { message: Option<String> },
}

impl SubmissionError {
    pub fn missing_fields() -> Self {
        Self::Validation {
            message: MISSING_FIELDS_MESSAGE.to_string(),
        }
    }

    pub fn network(host: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            host: host.into(),
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Unknown {
            message: (!message.trim().is_empty()).then_some(message),
        }
    }

    pub fn category(&self) -> SubmissionErrorCategory {
        match self {
            Self::Validation { .. } => SubmissionErrorCategory::UserActionRequired,
            Self::Server { .. } => SubmissionErrorCategory::ServiceFailure,
            Self::Network { .. } => SubmissionErrorCategory::Connectivity,
            Self::Unknown { .. } => SubmissionErrorCategory::Internal,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message } => message.clone(),
            Self::Server { status } => format!("Server error: {status}"),
            Self::Network { host, .. } => format!(
                "Unable to connect to the server. Please ensure your n8n webhook is running on {host} and CORS is enabled."
            ),
            Self::Unknown { message } => message
                .clone()
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
        }
    }
}
