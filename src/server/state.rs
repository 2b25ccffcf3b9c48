use axum::extract::FromRef;

use crate::job::JobController;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedJobController = Arc<JobController>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub controller: GuardedJobController,
    pub hash: String,
}

impl FromRef<ServerState> for GuardedJobController {
    fn from_ref(input: &ServerState) -> Self {
        input.controller.clone()
    }
}
