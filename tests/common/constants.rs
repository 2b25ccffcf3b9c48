//! Shared constants for end-to-end tests

/// Timeout for individual HTTP requests
pub const REQUEST_TIMEOUT_SECS: u64 = 5;

/// How long to wait for the server to accept connections
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// How long to wait for an admitted run to settle
pub const SETTLE_TIMEOUT_MS: u64 = 5000;

/// Poll interval for readiness and settlement waits
pub const POLL_INTERVAL_MS: u64 = 10;
