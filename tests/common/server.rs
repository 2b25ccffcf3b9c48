//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own job controller and a
//! scripted browser session.

use super::constants::*;
use super::sessions::{ScriptedProvider, SessionScript, RESERVE_MARKER, WAITLIST_MARKER};
use autoreserve_server::automation::AutomationSettings;
use autoreserve_server::job::JobController;
use autoreserve_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

fn test_settings() -> AutomationSettings {
    AutomationSettings {
        post_login_delay: Duration::from_millis(1),
        post_search_delay: Duration::from_millis(1),
        modal_wait: Duration::from_millis(1),
        requery_base_delay: Duration::from_millis(1),
        requery_jitter: Duration::from_millis(0),
        reserve_marker: RESERVE_MARKER.to_string(),
        waitlist_marker: WAITLIST_MARKER.to_string(),
    }
}

/// Test server instance with an isolated job controller
///
/// When dropped, the server gracefully shuts down.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port, with the given scripted
    /// session behavior behind the job controller.
    ///
    /// # Panics
    ///
    /// Panics if port binding fails or the server doesn't become ready
    /// within the timeout.
    pub async fn spawn(script: SessionScript) -> Self {
        let controller = Arc::new(JobController::new(
            Arc::new(ScriptedProvider { script }),
            test_settings(),
        ));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
        };
        let app = make_app(config, controller);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("Test server failed");
        });

        let server = TestServer {
            base_url,
            port,
            _shutdown_tx: Some(shutdown_tx),
        };
        server.wait_ready().await;
        server
    }

    async fn wait_ready(&self) {
        let client = reqwest::Client::new();
        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => {
                    return;
                }
                _ => {
                    tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
