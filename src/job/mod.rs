mod controller;

pub use controller::{JobController, JobError, JobResult, JobState, StatusSnapshot};
