//! Client-side status poller.
//!
//! Used by the watch CLI: polls `/status` on a fixed interval, renders new
//! log lines through the humanizer and stops by itself once the job is no
//! longer running, yielding one final classified message.

use crate::job::{JobResult, JobState, StatusSnapshot};
use crate::log_pipeline::{humanize, Severity};
use std::time::Duration;
use thiserror::Error;

/// How often the poller re-reads the status endpoint.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum PollerError {
    #[error("status request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Terminal classification of a settled job, for the final line of a watch.
pub fn classify(state: JobState, result: Option<&JobResult>) -> (String, Severity) {
    match (state, result) {
        (JobState::Finished, Some(JobResult::Claimed { ok: true, kind })) => {
            let message = match kind {
                crate::automation::ReservationKind::Reserve => {
                    "Reservation completed. Finish the payment in the browser.".to_string()
                }
                crate::automation::ReservationKind::Waitlist => {
                    "Waitlist application completed.".to_string()
                }
            };
            (message, Severity::Success)
        }
        (JobState::Error, Some(JobResult::Failed { error, .. })) => {
            (format!("Automation failed: {}", error), Severity::Error)
        }
        (JobState::Error, _) => ("Automation failed.".to_string(), Severity::Error),
        (_, Some(JobResult::Failed { error, .. })) => {
            (format!("Automation ended: {}", error), Severity::Warn)
        }
        _ => ("Automation ended.".to_string(), Severity::Warn),
    }
}

/// Strip the `[timestamp] ` prefix off a formatted status log line.
pub fn raw_message(line: &str) -> &str {
    if line.starts_with('[') {
        if let Some(end) = line.find("] ") {
            return &line[end + 2..];
        }
    }
    line
}

pub struct StatusPoller {
    client: reqwest::Client,
    status_url: String,
    interval: Duration,
}

impl StatusPoller {
    pub fn new(base_url: &str) -> Self {
        Self::with_interval(base_url, POLL_INTERVAL)
    }

    pub fn with_interval(base_url: &str, interval: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            status_url: format!("{}/status", base_url.trim_end_matches('/')),
            interval,
        }
    }

    pub async fn fetch(&self) -> Result<StatusSnapshot, PollerError> {
        let snapshot = self
            .client
            .get(&self.status_url)
            .send()
            .await?
            .error_for_status()?
            .json::<StatusSnapshot>()
            .await?;
        Ok(snapshot)
    }

    /// Poll until the job settles, feeding each new humanized log line to
    /// `render`. Returns the final classification.
    ///
    /// The status endpoint returns a bounded window of recent lines. New
    /// lines are found by locating the last rendered line in each fresh
    /// window, so rendering keeps up even after the window saturates and
    /// starts sliding.
    pub async fn watch<F>(&self, mut render: F) -> Result<(String, Severity), PollerError>
    where
        F: FnMut(&str, Severity),
    {
        let mut last_rendered: Option<String> = None;
        loop {
            let status = self.fetch().await?;

            let fresh = unrendered(&status.logs, last_rendered.as_deref());
            for line in fresh {
                let (text, severity) = humanize(raw_message(line));
                render(&text, severity);
            }
            if let Some(line) = fresh.last() {
                last_rendered = Some(line.clone());
            }

            if !status.running && status.state != JobState::Starting {
                return Ok(classify(status.state, status.result.as_ref()));
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}

/// The tail of `window` that comes after the last occurrence of the
/// previously rendered line. When that line slid out of the window (or a
/// new run replaced it entirely), the whole window is new.
fn unrendered<'a>(window: &'a [String], last_rendered: Option<&str>) -> &'a [String] {
    match last_rendered {
        Some(last) => match window.iter().rposition(|line| line.as_str() == last) {
            Some(pos) => &window[pos + 1..],
            None => window,
        },
        None => window,
    }
}
