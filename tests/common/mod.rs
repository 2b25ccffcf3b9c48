//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{SessionScript, TestClient, TestServer};
//!
//! #[tokio::test]
//! async fn test_reserve() {
//!     let server = TestServer::spawn(SessionScript::InstantReserve).await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let response = client.start_default().await;
//!     assert_eq!(response.status(), reqwest::StatusCode::OK);
//! }
//! ```

mod client;
mod constants;
mod server;
mod sessions;

// Public API - this is what tests import
pub use client::TestClient;
#[allow(unused_imports)]
pub use constants::*;
pub use server::TestServer;
pub use sessions::SessionScript;
