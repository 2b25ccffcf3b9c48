//! Singleton lifecycle for the automation job.
//!
//! At most one run exists at a time. Admission, cancellation and settlement
//! all go through one mutex so concurrent starts can never both win and a
//! run settles exactly once.

use crate::automation::{
    run_automation, AutomationSettings, EngineError, ReservationKind, SearchRequest, StartParams,
};
use crate::browser::SessionProvider;
use crate::log_pipeline::{LogBuffer, STATUS_SNAPSHOT_LIMIT};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// Lifecycle states of the job, as reported by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Idle,
    Starting,
    Running,
    Finished,
    Error,
}

/// Terminal outcome of a settled run.
///
/// On the wire this is either `{"ok":true,"type":"reserve"|"waitlist"}` or
/// `{"ok":false,"error":"..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobResult {
    Claimed {
        ok: bool,
        #[serde(rename = "type")]
        kind: ReservationKind,
    },
    Failed {
        ok: bool,
        error: String,
    },
}

impl JobResult {
    pub fn claimed(kind: ReservationKind) -> Self {
        JobResult::Claimed { ok: true, kind }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        JobResult::Failed {
            ok: false,
            error: error.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, JobResult::Claimed { ok: true, .. })
    }
}

/// Errors returned to callers of the control operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobError {
    #[error("A job is already running.")]
    AlreadyRunning,

    #[error("No job is running.")]
    NotRunning,

    #[error("{0}")]
    Validation(String),
}

/// Point-in-time view of the job for the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub running: bool,
    pub state: JobState,
    pub logs: Vec<String>,
    pub result: Option<JobResult>,
}

struct JobInner {
    running: bool,
    state: JobState,
    cancel: Option<CancellationToken>,
    result: Option<JobResult>,
}

/// Owner of the singleton run: admits, cancels and settles it.
pub struct JobController {
    inner: Arc<Mutex<JobInner>>,
    log: Arc<LogBuffer>,
    provider: Arc<dyn SessionProvider>,
    settings: AutomationSettings,
}

impl JobController {
    pub fn new(provider: Arc<dyn SessionProvider>, settings: AutomationSettings) -> Self {
        Self {
            inner: Arc::new(Mutex::new(JobInner {
                running: false,
                state: JobState::Idle,
                cancel: None,
                result: None,
            })),
            log: Arc::new(LogBuffer::new()),
            provider,
            settings,
        }
    }

    /// If no run is active, validate the parameters and admit a new one.
    ///
    /// An active run wins over validation, so a busy controller always
    /// answers `AlreadyRunning`. Rejections leave all state untouched;
    /// admission resets the log and result of the previous run before the
    /// lock is released, so no snapshot mixes the runs.
    pub fn start(&self, params: StartParams) -> Result<(), JobError> {
        let cancel = CancellationToken::new();
        let request = {
            let mut inner = self.inner.lock().unwrap();
            if inner.running {
                return Err(JobError::AlreadyRunning);
            }
            let request = SearchRequest::validate(params).map_err(JobError::Validation)?;
            inner.running = true;
            inner.state = JobState::Starting;
            inner.result = None;
            inner.cancel = Some(cancel.clone());
            self.log.clear();
            self.log.append("Automation started.");
            request
        };

        let inner = Arc::clone(&self.inner);
        let log = Arc::clone(&self.log);
        let provider = Arc::clone(&self.provider);
        let settings = self.settings.clone();

        tokio::spawn(async move {
            {
                let mut inner = inner.lock().unwrap();
                if inner.state == JobState::Starting {
                    inner.state = JobState::Running;
                }
            }

            // Run the engine in its own task so a panic still settles the job.
            let run_log = Arc::clone(&log);
            let run_cancel = cancel.clone();
            let handle = tokio::spawn(async move {
                let session = provider
                    .create(request.headless)
                    .await
                    .map_err(|e| EngineError::Fault(e.to_string()))?;
                run_automation(session, &request, &settings, &run_log, &run_cancel).await
            });
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(join_err) => Err(EngineError::Fault(format!("Task failed: {}", join_err))),
            };

            settle(&inner, &log, outcome);
        });

        Ok(())
    }

    /// Request cancellation of the active run. The run keeps its `running`
    /// flag until the engine observes the token and settles.
    pub fn stop(&self) -> Result<(), JobError> {
        let cancel = {
            let inner = self.inner.lock().unwrap();
            if !inner.running {
                return Err(JobError::NotRunning);
            }
            inner.cancel.clone()
        };
        match cancel {
            Some(token) => {
                self.log.append("Stop requested. Cleaning up...");
                token.cancel();
                Ok(())
            }
            None => Err(JobError::NotRunning),
        }
    }

    /// Read-only snapshot: flag, state, recent formatted log lines, result.
    pub fn status(&self) -> StatusSnapshot {
        let inner = self.inner.lock().unwrap();
        StatusSnapshot {
            running: inner.running,
            state: inner.state,
            logs: self.log.snapshot_formatted(STATUS_SNAPSHOT_LIMIT),
            result: inner.result.clone(),
        }
    }
}

/// Settle the run: record the terminal state and result, release the token
/// and the running flag. Runs exactly once per admitted run.
fn settle(
    inner: &Arc<Mutex<JobInner>>,
    log: &LogBuffer,
    outcome: Result<ReservationKind, EngineError>,
) {
    let mut inner = inner.lock().unwrap();
    match outcome {
        Ok(kind) => {
            inner.state = JobState::Finished;
            inner.result = Some(JobResult::claimed(kind));
            log.append("Automation finished.");
        }
        Err(EngineError::Cancelled) => {
            // A user stop is a normal ending, not an error.
            inner.state = JobState::Finished;
            inner.result = Some(JobResult::failed("Stopped by user"));
            log.append("Automation stopped.");
            warn!("run cancelled by user");
        }
        Err(EngineError::Fault(msg)) => {
            inner.state = JobState::Error;
            inner.result = Some(JobResult::failed(msg.clone()));
            log.append(format!("Error: {}", msg));
            error!("run faulted: {}", msg);
        }
    }
    inner.cancel = None;
    inner.running = false;
}
