mod audio_file;
mod errors;
mod form;
mod submission;

pub use audio_file::{AudioFile, has_audio_mime_type};
pub use errors::{
    GENERIC_FAILURE_MESSAGE, MISSING_FIELDS_MESSAGE, SubmissionError, SubmissionErrorCategory,
};
pub use form::{DragState, FormInputs, PROMPT_MAX_CHARS, PromptText, Slot};
pub use submission::{
    PROBE_REACHABLE_MESSAGE, PROBE_UNREACHABLE_MESSAGE, ProbeState, SUCCESS_BANNER_MESSAGE,
    SubmissionPayload, SubmissionState,
};
