//! HTTP client for end-to-end tests
//!
//! This module wraps reqwest with methods for the job control endpoints.
//! When routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP test client for the job control API
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// A start body that passes validation; tests tweak fields as needed.
    pub fn default_start_body() -> Value {
        json!({
            "userId": "test-user",
            "password": "test-pass",
            "departureStation": "Suseo",
            "arrivalStation": "Busan",
            "date": "2026-09-01",
            "time": "10:00",
            "numToCheck": 3,
            "mode": "reserve",
            "headless": true,
        })
    }

    /// POST /start
    pub async fn start(&self, body: &Value) -> Response {
        self.client
            .post(format!("{}/start", self.base_url))
            .json(body)
            .send()
            .await
            .expect("Start request failed")
    }

    /// POST /start with the default valid body
    pub async fn start_default(&self) -> Response {
        self.start(&Self::default_start_body()).await
    }

    /// POST /stop
    pub async fn stop(&self) -> Response {
        self.client
            .post(format!("{}/stop", self.base_url))
            .send()
            .await
            .expect("Stop request failed")
    }

    /// GET /status
    pub async fn status(&self) -> Value {
        self.client
            .get(format!("{}/status", self.base_url))
            .send()
            .await
            .expect("Status request failed")
            .json()
            .await
            .expect("Status response was not JSON")
    }

    /// Polls /status until the job reports `running: false`.
    ///
    /// # Panics
    ///
    /// Panics if the run doesn't settle within the timeout.
    pub async fn wait_until_settled(&self) -> Value {
        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SETTLE_TIMEOUT_MS);

        loop {
            let status = self.status().await;
            if status["running"] == json!(false) {
                return status;
            }
            if start.elapsed() > timeout {
                panic!("Run did not settle within {}ms: {}", SETTLE_TIMEOUT_MS, status);
            }
            tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }
}
