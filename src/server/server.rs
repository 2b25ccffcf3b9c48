use anyhow::Result;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crate::automation::StartParams;
use crate::job::{JobController, JobError, StatusSnapshot};
use tower_http::cors::CorsLayer;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::{log_requests, state::*, RequestsLoggingLevel, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Serialize)]
struct ControlResponse {
    ok: bool,
    message: String,
}

fn control_ok(message: &str) -> Response {
    Json(ControlResponse {
        ok: true,
        message: message.to_string(),
    })
    .into_response()
}

fn control_err(status: StatusCode, message: String) -> Response {
    (status, Json(ControlResponse { ok: false, message })).into_response()
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    };
    Json(stats)
}

async fn start_job(
    State(controller): State<GuardedJobController>,
    Json(params): Json<StartParams>,
) -> Response {
    match controller.start(params) {
        Ok(()) => control_ok("Automation started."),
        Err(err @ JobError::AlreadyRunning) => {
            control_err(StatusCode::CONFLICT, err.to_string())
        }
        Err(JobError::Validation(msg)) => control_err(StatusCode::BAD_REQUEST, msg),
        Err(err) => control_err(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

async fn stop_job(State(controller): State<GuardedJobController>) -> Response {
    match controller.stop() {
        Ok(()) => control_ok("Stop requested."),
        Err(err @ JobError::NotRunning) => control_err(StatusCode::CONFLICT, err.to_string()),
        Err(err) => control_err(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

async fn job_status(State(controller): State<GuardedJobController>) -> Json<StatusSnapshot> {
    Json(controller.status())
}

pub fn make_app(config: ServerConfig, controller: Arc<JobController>) -> Router {
    let state = ServerState {
        config,
        start_time: Instant::now(),
        controller,
        hash: env!("GIT_HASH").to_string(),
    };

    Router::new()
        .route("/", get(home))
        .route("/start", post(start_job))
        .route("/stop", post(stop_job))
        .route("/status", get(job_status))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

pub async fn run_server(
    controller: Arc<JobController>,
    requests_logging_level: RequestsLoggingLevel,
    port: u16,
) -> Result<()> {
    let config = ServerConfig {
        port,
        requests_logging_level,
    };
    let app = make_app(config, controller);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}
