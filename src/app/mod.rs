mod form_controller;
mod submission_job_manager;

pub use form_controller::{
    ControllerConfig, DEFAULT_RESET_DELAY, FormController, IgnoreReason, IntakeOutcome,
    ResetPolicy, SessionState,
};
pub use submission_job_manager::{
    JobManagerError, SubmissionJobKind, SubmissionJobManager, SubmissionJobState,
    SubmissionJobUpdate,
};
