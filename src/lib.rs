//! Autoreserve Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod automation;
pub mod browser;
pub mod config;
pub mod job;
pub mod log_pipeline;
pub mod poller;
pub mod server;
pub mod slot;

// Re-export commonly used types for convenience
pub use browser::{BrowserSession, NoopSessionProvider, SessionProvider};
pub use job::{JobController, JobResult, JobState};
pub use log_pipeline::{LogBuffer, Severity};
pub use server::{run_server, RequestsLoggingLevel};
