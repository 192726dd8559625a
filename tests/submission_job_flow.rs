use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use mockito::Server;
use shortgen::app::{
    FormController, SubmissionJobKind, SubmissionJobManager, SubmissionJobState,
    SubmissionJobUpdate,
};
use shortgen::domain::{Slot, SubmissionState};
use shortgen::infra::audio::load_audio_file;
use shortgen::infra::webhook::{HttpWebhookClient, WebhookConfig};

#[path = "support/temp_file_fixture.rs"]
mod temp_file_fixture;

use temp_file_fixture::write_bytes_file;

fn manager_for(url: &str) -> SubmissionJobManager {
    let config = WebhookConfig::new(url, None).expect("mock endpoint should be valid");
    let client = HttpWebhookClient::with_config(config).expect("client should build");
    SubmissionJobManager::new(Arc::new(client)).expect("worker should start")
}

fn wait_for_finished(manager: &SubmissionJobManager, job_id: u64) -> SubmissionJobUpdate {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if let Some(update) = manager
            .drain_updates()
            .into_iter()
            .find(|update| update.job_id == job_id && update.is_finished())
        {
            return update;
        }
        thread::sleep(Duration::from_millis(10));
    }
    panic!("job {job_id} did not finish in time");
}

fn filled_controller() -> FormController {
    let cta = write_bytes_file("shortgen-job-cta", "mp3", b"ID3-cta");
    let bgm = write_bytes_file("shortgen-job-bgm", "m4a", b"m4a-bgm");
    assert!(cta.file_name().ends_with(".mp3"));

    let mut controller = FormController::default();
    controller.pick_file(
        Slot::Cta,
        Some(load_audio_file(cta.path()).expect("cta fixture should load")),
    );
    controller.pick_file(
        Slot::Bgm,
        Some(load_audio_file(bgm.path()).expect("bgm fixture should load")),
    );
    controller.edit_prompt("Retro arcade montage");
    controller
}

#[test]
fn background_submission_feeds_result_back_into_controller() {
    let mut server = Server::new();
    let mock = server.mock("POST", "/hook").with_status(201).create();
    let manager = manager_for(&format!("{}/hook", server.url()));
    let mut controller = filled_controller();
    assert!(controller.state().inputs.is_complete());

    let payload = controller
        .begin_submission()
        .expect("complete form should produce a payload");
    let job_id = manager.submit(payload).expect("job should be queued");
    assert_eq!(controller.state().submission, SubmissionState::InFlight);

    let update = wait_for_finished(&manager, job_id);
    assert_eq!(update.kind, SubmissionJobKind::Submission);
    assert_eq!(update.state, SubmissionJobState::Succeeded);

    let finished_at = Instant::now();
    controller.finish_submission(Ok(()), finished_at);
    mock.assert();
    assert_eq!(controller.state().submission, SubmissionState::Succeeded);
    assert!(controller.poll_pending_reset(finished_at + Duration::from_secs(3)));
}

#[test]
fn background_submission_reports_server_status() {
    let mut server = Server::new();
    let mock = server.mock("POST", "/hook").with_status(502).create();
    let manager = manager_for(&format!("{}/hook", server.url()));
    let mut controller = filled_controller();

    let payload = controller
        .begin_submission()
        .expect("complete form should produce a payload");
    let job_id = manager.submit(payload).expect("job should be queued");
    let update = wait_for_finished(&manager, job_id);

    mock.assert();
    assert_eq!(update.state, SubmissionJobState::Failed);
    let error = update.error.expect("failed job should carry an error");
    controller.finish_submission(Err(error), Instant::now());
    assert_eq!(
        controller.state().submission.error_message(),
        Some("Server error: 502")
    );
}

#[test]
fn background_probe_reports_reachability() {
    let mut server = Server::new();
    let mock = server.mock("POST", "/hook").with_status(200).create();
    let manager = manager_for(&format!("{}/hook", server.url()));

    let job_id = manager.probe().expect("probe should be queued");
    let update = wait_for_finished(&manager, job_id);

    mock.assert();
    assert_eq!(update.kind, SubmissionJobKind::Probe);
    assert_eq!(update.state, SubmissionJobState::Succeeded);
    assert_eq!(manager.active_jobs(), 0);
}
