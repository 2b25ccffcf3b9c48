mod buffer;
mod humanize;

pub use buffer::{LogBuffer, LogEntry, LOG_CAPACITY, STATUS_SNAPSHOT_LIMIT};
pub use humanize::{humanize, Severity};
