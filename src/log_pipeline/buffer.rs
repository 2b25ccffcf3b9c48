//! Append-only, capacity-bounded run log.
//!
//! The buffer is owned by the job controller and is the only way log lines
//! reach a run's history. Entries keep their append order; once the capacity
//! is exceeded the oldest entries are dropped first.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::info;

/// Maximum number of entries retained per run.
pub const LOG_CAPACITY: usize = 5000;

/// How many recent entries a status read returns.
pub const STATUS_SNAPSHOT_LIMIT: usize = 200;

/// A single timestamped raw log line.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl LogEntry {
    /// Wire format used by the status endpoint: `[ISO-8601] message`.
    pub fn formatted(&self) -> String {
        format!("[{}] {}", self.timestamp.to_rfc3339(), self.message)
    }
}

/// Thread-safe bounded log for a single automation run.
pub struct LogBuffer {
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    /// Timestamp a raw message and append it, dropping the oldest entries
    /// beyond the capacity bound. The line is mirrored to the server log.
    pub fn append(&self, message: impl Into<String>) {
        let entry = LogEntry {
            timestamp: Utc::now(),
            message: message.into(),
        };
        info!("{}", entry.message);

        let mut entries = self.entries.lock().unwrap();
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// The most recent `limit` entries, in chronological order. Read-only.
    pub fn snapshot(&self, limit: usize) -> Vec<LogEntry> {
        let entries = self.entries.lock().unwrap();
        let skip = entries.len().saturating_sub(limit);
        entries.iter().skip(skip).cloned().collect()
    }

    /// The most recent `limit` entries in wire format.
    pub fn snapshot_formatted(&self, limit: usize) -> Vec<String> {
        self.snapshot(limit)
            .into_iter()
            .map(|e| e.formatted())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Discard all entries. Called when a new run is admitted.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}
