use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{
    AudioFile, DragState, FormInputs, ProbeState, Slot, SubmissionError, SubmissionPayload,
    SubmissionState,
};
use crate::infra::env::{ConfigError, read_delay_from_env};
use crate::infra::webhook::WebhookClient;

pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(3000);
const ENV_RESET_DELAY_MS: &str = "SHORTGEN_RESET_DELAY_MS";

/// What a manual reset does to an auto-reset that is already scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResetPolicy {
    #[default]
    CancelPending,
    KeepPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub reset_delay: Duration,
    pub reset_policy: ResetPolicy,
}

impl ControllerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            reset_delay: read_delay_from_env(ENV_RESET_DELAY_MS)?.unwrap_or(DEFAULT_RESET_DELAY),
            ..Self::default()
        })
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            reset_delay: DEFAULT_RESET_DELAY,
            reset_policy: ResetPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    NoFileOffered,
    NotAudio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IntakeOutcome {
    Attached { replaced: bool },
    Ignored { reason: IgnoreReason },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub inputs: FormInputs,
    pub drag: DragState,
    pub submission: SubmissionState,
    pub probe: ProbeState,
    #[serde(skip)]
    pub pending_reset: Option<Instant>,
}

/// Owns one session's form state. Every mutation goes through a named transition.
#[derive(Debug, Default)]
pub struct FormController {
    config: ControllerConfig,
    state: SessionState,
}

impl FormController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.clone()
    }

    pub fn pick_file(&mut self, slot: Slot, file: Option<AudioFile>) -> IntakeOutcome {
        let Some(file) = file else {
            return ignored(IgnoreReason::NoFileOffered);
        };
        if !file.has_audio_mime_type() {
            debug!(
                slot = slot.field_name(),
                file = file.name(),
                mime_type = file.mime_type(),
                "ignoring non-audio file from picker"
            );
            return ignored(IgnoreReason::NotAudio);
        }
        self.attach(slot, file)
    }

    pub fn drop_files(&mut self, slot: Slot, files: Vec<AudioFile>) -> IntakeOutcome {
        self.state.drag.set(slot, false);
        if files.is_empty() {
            return ignored(IgnoreReason::NoFileOffered);
        }

        let offered = files.len();
        match files.into_iter().find(AudioFile::has_audio_mime_type) {
            Some(file) => self.attach(slot, file),
            None => {
                debug!(
                    slot = slot.field_name(),
                    offered, "ignoring drop without audio files"
                );
                ignored(IgnoreReason::NotAudio)
            }
        }
    }

    pub fn drag_enter(&mut self, slot: Slot) {
        self.state.drag.set(slot, true);
    }

    pub fn drag_leave(&mut self, slot: Slot) {
        self.state.drag.set(slot, false);
    }

    /// Applies a full replacement of the prompt text; refused edits leave it unchanged.
    pub fn edit_prompt(&mut self, text: &str) -> bool {
        self.state.inputs.prompt.try_replace(text)
    }

    pub fn can_submit(&self) -> bool {
        !self.state.submission.is_in_flight() && self.state.inputs.is_complete()
    }

    /// Runs the completeness guard and enters `InFlight`, returning what to send.
    /// Returns `None` when nothing should be sent.
    pub fn begin_submission(&mut self) -> Option<SubmissionPayload> {
        if self.state.submission.is_in_flight() {
            warn!("submission already in flight; ignoring submit");
            return None;
        }

        let inputs = self.state.inputs.clone();
        let (Some(cta), Some(bgm)) = (inputs.cta, inputs.bgm) else {
            return self.reject_incomplete();
        };
        if inputs.prompt.is_blank() {
            return self.reject_incomplete();
        }

        let payload = SubmissionPayload {
            cta,
            bgm,
            prompt: inputs.prompt.as_str().to_string(),
        };
        // A resubmit during the success banner supersedes the scheduled reset.
        self.state.pending_reset = None;
        self.state.submission = SubmissionState::InFlight;
        Some(payload)
    }

    pub fn finish_submission(&mut self, result: Result<(), SubmissionError>, now: Instant) {
        if !self.state.submission.is_in_flight() {
            warn!("submission result arrived while not in flight; dropping it");
            return;
        }

        match result {
            Ok(()) => {
                info!(
                    reset_delay_ms = self.config.reset_delay.as_millis() as u64,
                    "submission accepted by webhook"
                );
                self.state.submission = SubmissionState::Succeeded;
                self.state.pending_reset = Some(now + self.config.reset_delay);
            }
            Err(error) => {
                warn!(category = ?error.category(), %error, "submission failed");
                self.state.submission = SubmissionState::failed(&error);
            }
        }
    }

    /// Synchronous submit: guard, send, and record the outcome.
    pub fn submit_with(&mut self, client: &dyn WebhookClient, now: Instant) {
        let Some(payload) = self.begin_submission() else {
            return;
        };
        let result = client.submit(&payload);
        self.finish_submission(result, now);
    }

    /// Applies the scheduled post-success reset once `now` reaches it.
    pub fn poll_pending_reset(&mut self, now: Instant) -> bool {
        match self.state.pending_reset {
            Some(deadline) if now >= deadline => {
                debug!("applying scheduled form reset");
                self.clear_form();
                true
            }
            _ => false,
        }
    }

    pub fn has_pending_reset(&self) -> bool {
        self.state.pending_reset.is_some()
    }

    pub fn reset(&mut self) {
        let pending_reset = match self.config.reset_policy {
            ResetPolicy::CancelPending => None,
            ResetPolicy::KeepPending => self.state.pending_reset,
        };
        self.clear_form();
        self.state.pending_reset = pending_reset;
    }

    pub fn begin_probe(&mut self) -> bool {
        if self.state.probe.is_testing() {
            return false;
        }
        self.state.probe = ProbeState::Testing;
        true
    }

    pub fn finish_probe(&mut self, reachable: bool) {
        self.state.probe = if reachable {
            ProbeState::Reachable
        } else {
            ProbeState::Unreachable
        };
    }

    pub fn probe_with(&mut self, client: &dyn WebhookClient) {
        if !self.begin_probe() {
            return;
        }
        let result = client.probe();
        if let Err(error) = &result {
            info!(endpoint = client.endpoint(), %error, "connectivity probe failed");
        }
        self.finish_probe(result.is_ok());
    }

    fn attach(&mut self, slot: Slot, file: AudioFile) -> IntakeOutcome {
        info!(
            slot = slot.field_name(),
            file = file.name(),
            size_bytes = file.size_bytes(),
            "audio file attached"
        );
        let replaced = self.state.inputs.attach(slot, file);
        IntakeOutcome::Attached { replaced }
    }

    fn reject_incomplete(&mut self) -> Option<SubmissionPayload> {
        self.state.submission = SubmissionState::failed(&SubmissionError::missing_fields());
        None
    }

    fn clear_form(&mut self) {
        self.state.inputs.clear();
        self.state.submission = SubmissionState::Idle;
        self.state.pending_reset = None;
    }
}

fn ignored(reason: IgnoreReason) -> IntakeOutcome {
    IntakeOutcome::Ignored { reason }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    use super::{ControllerConfig, FormController, IgnoreReason, IntakeOutcome, ResetPolicy};
    use crate::domain::{
        AudioFile, MISSING_FIELDS_MESSAGE, ProbeState, Slot, SubmissionError, SubmissionPayload,
        SubmissionState,
    };
    use crate::infra::webhook::WebhookClient;

    struct ScriptedClient {
        submit_result: Result<(), SubmissionError>,
        probe_result: Result<(), SubmissionError>,
        submitted: Mutex<Vec<SubmissionPayload>>,
    }

    impl ScriptedClient {
        fn submitting(result: Result<(), SubmissionError>) -> Self {
            Self {
                submit_result: result,
                probe_result: Ok(()),
                submitted: Mutex::new(Vec::new()),
            }
        }

        fn probing(result: Result<(), SubmissionError>) -> Self {
            Self {
                submit_result: Ok(()),
                probe_result: result,
                submitted: Mutex::new(Vec::new()),
            }
        }

        fn submit_count(&self) -> usize {
            self.submitted.lock().expect("submitted lock poisoned").len()
        }
    }

    impl WebhookClient for ScriptedClient {
        fn endpoint(&self) -> &str {
            "http://localhost:8080/webhook/test"
        }

        fn submit(&self, payload: &SubmissionPayload) -> Result<(), SubmissionError> {
            self.submitted
                .lock()
                .expect("submitted lock poisoned")
                .push(payload.clone());
            self.submit_result.clone()
        }

        fn probe(&self) -> Result<(), SubmissionError> {
            self.probe_result.clone()
        }
    }

    fn cta() -> AudioFile {
        AudioFile::new("cta.mp3", "audio/mpeg", vec![0xff, 0xfb, 0x90])
    }

    fn bgm() -> AudioFile {
        AudioFile::new("bgm.wav", "audio/wav", vec![b'R', b'I', b'F', b'F'])
    }

    fn filled_controller() -> FormController {
        let mut controller = FormController::default();
        controller.pick_file(Slot::Cta, Some(cta()));
        controller.pick_file(Slot::Bgm, Some(bgm()));
        assert!(controller.edit_prompt("upbeat fitness ad"));
        controller
    }

    #[test]
    fn picker_ignores_non_audio_files_silently() {
        let mut controller = FormController::default();
        controller.pick_file(Slot::Cta, Some(cta()));

        let outcome = controller.pick_file(
            Slot::Cta,
            Some(AudioFile::new("notes.txt", "text/plain", vec![1])),
        );

        assert_eq!(
            outcome,
            IntakeOutcome::Ignored {
                reason: IgnoreReason::NotAudio
            }
        );
        assert_eq!(
            controller.state().inputs.cta.as_ref().map(AudioFile::name),
            Some("cta.mp3")
        );
        assert_eq!(controller.state().submission, SubmissionState::Idle);
    }

    #[test]
    fn picker_cancel_leaves_slot_unchanged() {
        let mut controller = FormController::default();
        assert_eq!(
            controller.pick_file(Slot::Bgm, None),
            IntakeOutcome::Ignored {
                reason: IgnoreReason::NoFileOffered
            }
        );
        assert!(controller.state().inputs.bgm.is_none());
    }

    #[test]
    fn drop_selects_first_audio_file_and_clears_drag_flag() {
        let mut controller = FormController::default();
        controller.drag_enter(Slot::Bgm);
        assert!(controller.state().drag.bgm_active);

        let outcome = controller.drop_files(
            Slot::Bgm,
            vec![
                AudioFile::new("cover.png", "image/png", vec![1]),
                AudioFile::new("loop.m4a", "audio/mp4", vec![2]),
                AudioFile::new("other.mp3", "audio/mpeg", vec![3]),
            ],
        );

        assert_eq!(outcome, IntakeOutcome::Attached { replaced: false });
        assert_eq!(
            controller.state().inputs.bgm.as_ref().map(AudioFile::name),
            Some("loop.m4a")
        );
        assert!(!controller.state().drag.bgm_active);
    }

    #[test]
    fn drop_without_audio_keeps_existing_file() {
        let mut controller = FormController::default();
        controller.pick_file(Slot::Cta, Some(cta()));
        controller.drag_enter(Slot::Cta);

        let outcome = controller.drop_files(
            Slot::Cta,
            vec![AudioFile::new("clip.mp4", "video/mp4", vec![1])],
        );

        assert!(matches!(outcome, IntakeOutcome::Ignored { .. }));
        assert_eq!(
            controller.state().inputs.cta.as_ref().map(AudioFile::name),
            Some("cta.mp3")
        );
        assert!(!controller.state().drag.cta_active);
    }

    #[test]
    fn drag_leave_resets_only_that_slot() {
        let mut controller = FormController::default();
        controller.drag_enter(Slot::Cta);
        controller.drag_enter(Slot::Bgm);
        controller.drag_leave(Slot::Cta);
        assert!(!controller.state().drag.cta_active);
        assert!(controller.state().drag.bgm_active);
    }

    #[test]
    fn incomplete_submission_fails_without_network_call() {
        let client = ScriptedClient::submitting(Ok(()));
        let cases: [fn(&mut FormController); 3] = [
            |c| {
                c.pick_file(Slot::Bgm, Some(bgm()));
                c.edit_prompt("upbeat fitness ad");
            },
            |c| {
                c.pick_file(Slot::Cta, Some(cta()));
                c.edit_prompt("upbeat fitness ad");
            },
            |c| {
                c.pick_file(Slot::Cta, Some(cta()));
                c.pick_file(Slot::Bgm, Some(bgm()));
                c.edit_prompt("   \n ");
            },
        ];

        for fill in cases {
            let mut controller = FormController::default();
            fill(&mut controller);
            assert!(!controller.can_submit());

            controller.submit_with(&client, Instant::now());

            assert_eq!(
                controller.state().submission,
                SubmissionState::Failed {
                    message: MISSING_FIELDS_MESSAGE.to_string()
                }
            );
        }
        assert_eq!(client.submit_count(), 0);
    }

    #[test]
    fn successful_submission_resets_after_delay() {
        let client = ScriptedClient::submitting(Ok(()));
        let mut controller = filled_controller();
        let start = Instant::now();

        controller.submit_with(&client, start);

        assert_eq!(controller.state().submission, SubmissionState::Succeeded);
        assert_eq!(client.submit_count(), 1);
        assert!(!controller.poll_pending_reset(start + Duration::from_millis(2999)));
        assert_eq!(controller.state().submission, SubmissionState::Succeeded);

        assert!(controller.poll_pending_reset(start + Duration::from_millis(3000)));
        assert!(controller.state().inputs.is_empty());
        assert_eq!(controller.state().submission, SubmissionState::Idle);
        assert!(!controller.has_pending_reset());
    }

    #[test]
    fn payload_carries_current_inputs() {
        let client = ScriptedClient::submitting(Ok(()));
        let mut controller = filled_controller();

        controller.submit_with(&client, Instant::now());

        let submitted = client.submitted.lock().expect("submitted lock poisoned");
        assert_eq!(submitted[0].cta.name(), "cta.mp3");
        assert_eq!(submitted[0].bgm.name(), "bgm.wav");
        assert_eq!(submitted[0].prompt, "upbeat fitness ad");
    }

    #[test]
    fn server_error_reports_status_and_keeps_inputs() {
        let client = ScriptedClient::submitting(Err(SubmissionError::Server { status: 500 }));
        let mut controller = filled_controller();

        controller.submit_with(&client, Instant::now());

        assert_eq!(
            controller.state().submission,
            SubmissionState::Failed {
                message: "Server error: 500".to_string()
            }
        );
        assert!(controller.state().inputs.is_complete());
        assert!(!controller.has_pending_reset());
    }

    #[test]
    fn network_error_surfaces_connectivity_guidance() {
        let client = ScriptedClient::submitting(Err(SubmissionError::network(
            "localhost:8080",
            "connection refused",
        )));
        let mut controller = filled_controller();

        controller.submit_with(&client, Instant::now());

        let message = controller
            .state()
            .submission
            .error_message()
            .expect("submission should fail");
        assert!(message.starts_with("Unable to connect to the server"));
        assert!(message.contains("localhost:8080"));
    }

    #[test]
    fn resubmitting_after_failure_re_enters_flight() {
        let mut controller = filled_controller();
        controller.submit_with(
            &ScriptedClient::submitting(Err(SubmissionError::Server { status: 502 })),
            Instant::now(),
        );
        assert!(controller.can_submit());

        let payload = controller.begin_submission();
        assert!(payload.is_some());
        assert_eq!(controller.state().submission, SubmissionState::InFlight);
    }

    #[test]
    fn second_submission_is_refused_while_in_flight() {
        let mut controller = filled_controller();
        assert!(controller.begin_submission().is_some());
        assert!(!controller.can_submit());
        assert!(controller.begin_submission().is_none());
        assert_eq!(controller.state().submission, SubmissionState::InFlight);
    }

    #[test]
    fn resubmit_during_success_banner_drops_scheduled_reset() {
        let mut controller = filled_controller();
        let start = Instant::now();
        controller.submit_with(&ScriptedClient::submitting(Ok(())), start);
        assert!(controller.has_pending_reset());

        assert!(controller.begin_submission().is_some());

        assert!(!controller.has_pending_reset());
        assert!(!controller.poll_pending_reset(start + Duration::from_secs(10)));
        assert_eq!(controller.state().submission, SubmissionState::InFlight);
    }

    #[test]
    fn late_result_without_flight_is_dropped() {
        let mut controller = filled_controller();
        controller.finish_submission(Ok(()), Instant::now());
        assert_eq!(controller.state().submission, SubmissionState::Idle);
        assert!(!controller.has_pending_reset());
    }

    #[test]
    fn manual_reset_cancels_pending_auto_reset_by_default() {
        let mut controller = filled_controller();
        let start = Instant::now();
        controller.submit_with(&ScriptedClient::submitting(Ok(())), start);

        controller.reset();
        controller.edit_prompt("next idea");

        assert!(!controller.poll_pending_reset(start + Duration::from_secs(10)));
        assert_eq!(controller.state().inputs.prompt.as_str(), "next idea");
    }

    #[test]
    fn keep_pending_policy_lets_auto_reset_fire_after_manual_reset() {
        let mut controller = FormController::new(ControllerConfig {
            reset_policy: ResetPolicy::KeepPending,
            ..ControllerConfig::default()
        });
        controller.pick_file(Slot::Cta, Some(cta()));
        controller.pick_file(Slot::Bgm, Some(bgm()));
        controller.edit_prompt("upbeat fitness ad");
        let start = Instant::now();
        controller.submit_with(&ScriptedClient::submitting(Ok(())), start);

        controller.reset();
        controller.edit_prompt("next idea");

        assert!(controller.poll_pending_reset(start + Duration::from_secs(3)));
        assert!(controller.state().inputs.is_empty());
    }

    #[test]
    fn reset_clears_failure_and_inputs() {
        let mut controller = filled_controller();
        controller.submit_with(
            &ScriptedClient::submitting(Err(SubmissionError::Server { status: 500 })),
            Instant::now(),
        );

        controller.reset();

        assert!(controller.state().inputs.is_empty());
        assert_eq!(controller.state().submission, SubmissionState::Idle);
    }

    #[test]
    fn prompt_edit_past_ceiling_is_refused() {
        let mut controller = FormController::default();
        let full = "x".repeat(500);
        assert!(controller.edit_prompt(&full));
        assert!(!controller.edit_prompt(&format!("{full}y")));
        assert_eq!(controller.state().inputs.prompt.char_count(), 500);
    }

    #[test]
    fn probe_collapses_any_failure_to_unreachable() {
        let mut controller = FormController::default();
        controller.probe_with(&ScriptedClient::probing(Err(SubmissionError::Server {
            status: 404,
        })));
        assert_eq!(controller.state().probe, ProbeState::Unreachable);

        controller.probe_with(&ScriptedClient::probing(Ok(())));
        assert_eq!(controller.state().probe, ProbeState::Reachable);
    }

    #[test]
    fn probe_does_not_touch_submission_state() {
        let mut controller = filled_controller();
        controller.submit_with(
            &ScriptedClient::submitting(Err(SubmissionError::network("localhost:8080", "refused"))),
            Instant::now(),
        );
        let failed = controller.state().submission.clone();

        assert!(controller.begin_probe());
        assert!(!controller.begin_probe());
        controller.finish_probe(false);

        assert_eq!(controller.state().submission, failed);
    }

    #[test]
    fn snapshot_serializes_without_file_bytes() {
        let controller = filled_controller();
        let json = serde_json::to_value(controller.snapshot()).expect("snapshot should serialize");

        assert_eq!(json["inputs"]["cta"]["name"], "cta.mp3");
        assert_eq!(json["inputs"]["bgm"]["mime_type"], "audio/wav");
        assert_eq!(json["inputs"]["prompt"], "upbeat fitness ad");
        assert_eq!(json["submission"]["state"], "idle");
        assert_eq!(json["probe"], "not_run");
        assert!(json["inputs"]["cta"].get("bytes").is_none());
    }
}
