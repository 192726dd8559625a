use crate::domain::{SubmissionError, SubmissionPayload};

pub trait WebhookClient: Send + Sync {
    fn endpoint(&self) -> &str;

    fn submit(&self, payload: &SubmissionPayload) -> Result<(), SubmissionError>;

    /// Empty POST to the same endpoint; any error or non-2xx status means unreachable.
    fn probe(&self) -> Result<(), SubmissionError>;
}
