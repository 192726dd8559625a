use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{SubmissionError, SubmissionPayload};
use crate::infra::webhook::WebhookClient;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobManagerError {
    #[error("failed to start webhook worker thread: {message}")]
    WorkerStart { message: String },
    #[error("webhook worker is not accepting jobs: {message}")]
    WorkerUnavailable { message: String },
}

impl JobManagerError {
    pub fn user_message(&self) -> String {
        match self {
            Self::WorkerStart { .. } | Self::WorkerUnavailable { .. } => {
                "The background sender stopped. Restart shortgen and try again.".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionJobKind {
    Submission,
    Probe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionJobState {
    Running,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionJobUpdate {
    pub job_id: u64,
    pub kind: SubmissionJobKind,
    pub state: SubmissionJobState,
    pub error: Option<SubmissionError>,
}

impl SubmissionJobUpdate {
    fn running(job_id: u64, kind: SubmissionJobKind) -> Self {
        Self {
            job_id,
            kind,
            state: SubmissionJobState::Running,
            error: None,
        }
    }

    fn finished(job_id: u64, kind: SubmissionJobKind, result: Result<(), SubmissionError>) -> Self {
        match result {
            Ok(()) => Self {
                job_id,
                kind,
                state: SubmissionJobState::Succeeded,
                error: None,
            },
            Err(error) => Self {
                job_id,
                kind,
                state: SubmissionJobState::Failed,
                error: Some(error),
            },
        }
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self.state, SubmissionJobState::Running)
    }
}

/// Runs webhook requests off the UI thread. Jobs are never cancelled or retried;
/// results are published as updates for the caller to drain.
pub struct SubmissionJobManager {
    next_job_id: AtomicU64,
    command_tx: mpsc::Sender<WorkerMessage>,
    shared: Arc<Mutex<SharedState>>,
    worker_handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl SubmissionJobManager {
    pub fn new(client: Arc<dyn WebhookClient>) -> Result<Self, JobManagerError> {
        let shared = Arc::new(Mutex::new(SharedState::default()));
        let (command_tx, command_rx) = mpsc::channel();
        let worker_tx = command_tx.clone();
        let worker_shared = Arc::clone(&shared);

        let handle = thread::Builder::new()
            .name("shortgen-webhook-worker".to_string())
            .spawn(move || worker_loop(client, command_rx, worker_tx, worker_shared))
            .map_err(|error| JobManagerError::WorkerStart {
                message: error.to_string(),
            })?;

        Ok(Self {
            next_job_id: AtomicU64::new(1),
            command_tx,
            shared,
            worker_handle: Mutex::new(Some(handle)),
        })
    }

    pub fn submit(&self, payload: SubmissionPayload) -> Result<u64, JobManagerError> {
        self.enqueue(Job::Submit(payload))
    }

    pub fn probe(&self) -> Result<u64, JobManagerError> {
        self.enqueue(Job::Probe)
    }

    pub fn active_jobs(&self) -> usize {
        self.shared
            .lock()
            .expect("webhook job state lock poisoned")
            .active
    }

    pub fn drain_updates(&self) -> Vec<SubmissionJobUpdate> {
        let mut shared = self
            .shared
            .lock()
            .expect("webhook job state lock poisoned");
        shared.updates.drain(..).collect()
    }

    fn enqueue(&self, job: Job) -> Result<u64, JobManagerError> {
        let job_id = self.next_job_id.fetch_add(1, Ordering::SeqCst);
        self.command_tx
            .send(WorkerMessage::Start { job_id, job })
            .map_err(|error| JobManagerError::WorkerUnavailable {
                message: error.to_string(),
            })?;
        Ok(job_id)
    }
}

impl Drop for SubmissionJobManager {
    fn drop(&mut self) {
        let _ = self.command_tx.send(WorkerMessage::Shutdown);

        if let Some(handle) = self
            .worker_handle
            .lock()
            .expect("webhook worker handle lock poisoned")
            .take()
        {
            let _ = handle.join();
        }
    }
}

#[derive(Default)]
struct SharedState {
    active: usize,
    updates: VecDeque<SubmissionJobUpdate>,
}

enum Job {
    Submit(SubmissionPayload),
    Probe,
}

impl Job {
    fn kind(&self) -> SubmissionJobKind {
        match self {
            Self::Submit(_) => SubmissionJobKind::Submission,
            Self::Probe => SubmissionJobKind::Probe,
        }
    }
}

enum WorkerMessage {
    Start {
        job_id: u64,
        job: Job,
    },
    Completion {
        job_id: u64,
        kind: SubmissionJobKind,
        result: Result<(), SubmissionError>,
    },
    Shutdown,
}

struct RunningJob {
    job_id: u64,
    task_handle: thread::JoinHandle<()>,
}

fn worker_loop(
    client: Arc<dyn WebhookClient>,
    command_rx: mpsc::Receiver<WorkerMessage>,
    command_tx: mpsc::Sender<WorkerMessage>,
    shared: Arc<Mutex<SharedState>>,
) {
    let mut running: Vec<RunningJob> = Vec::new();

    while let Ok(message) = command_rx.recv() {
        match message {
            WorkerMessage::Start { job_id, job } => {
                running.push(spawn_request(&client, &command_tx, &shared, job_id, job));
            }
            WorkerMessage::Completion {
                job_id,
                kind,
                result,
            } => {
                if let Some(index) = running.iter().position(|job| job.job_id == job_id) {
                    let finished = running.swap_remove(index);
                    let _ = finished.task_handle.join();
                }
                push_update(&shared, SubmissionJobUpdate::finished(job_id, kind, result));
            }
            WorkerMessage::Shutdown => {
                // Requests have no timeout; leave them detached instead of blocking shutdown.
                if !running.is_empty() {
                    debug!(
                        detached = running.len(),
                        "webhook worker shutting down with requests still open"
                    );
                }
                break;
            }
        }
    }
}

fn spawn_request(
    client: &Arc<dyn WebhookClient>,
    command_tx: &mpsc::Sender<WorkerMessage>,
    shared: &Arc<Mutex<SharedState>>,
    job_id: u64,
    job: Job,
) -> RunningJob {
    let kind = job.kind();
    let client_for_thread = Arc::clone(client);
    let tx_for_thread = command_tx.clone();

    push_update(shared, SubmissionJobUpdate::running(job_id, kind));
    info!(job_id, ?kind, endpoint = client.endpoint(), "webhook request started");

    let task_handle = thread::spawn(move || {
        let result = match job {
            Job::Submit(payload) => client_for_thread.submit(&payload),
            Job::Probe => client_for_thread.probe(),
        };
        let _ = tx_for_thread.send(WorkerMessage::Completion {
            job_id,
            kind,
            result,
        });
    });

    RunningJob {
        job_id,
        task_handle,
    }
}

fn push_update(shared: &Arc<Mutex<SharedState>>, update: SubmissionJobUpdate) {
    let mut shared = shared
        .lock()
        .expect("webhook job state lock poisoned during update");
    if update.is_finished() {
        shared.active = shared.active.saturating_sub(1);
    } else {
        shared.active += 1;
    }
    shared.updates.push_back(update);
}
