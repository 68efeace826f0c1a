//! Shared test helpers for `goplay-core` integration tests.
//!
//! These helpers provide a scripted transport and an observable session
//! store so that client tests can focus on behaviour instead of wiring.

#![allow(dead_code)]

pub mod executor;
pub mod store;

use std::sync::Arc;

use goplay_core::{GraphClient, RequestExecutor, SessionStore};

pub use executor::{Reply, ScriptedExecutor, OAUTH_ENDPOINT};
pub use store::{CountingSessionStore, UnavailableSessionStore};

pub const PUBLISHER_ID: &str = "1234";
pub const SECRET: &str = "s3cret";

/// Test-mode client for [`PUBLISHER_ID`]
pub fn client(executor: Arc<dyn RequestExecutor>, store: Arc<dyn SessionStore>) -> GraphClient {
    GraphClient::builder()
        .credentials(PUBLISHER_ID, SECRET)
        .test_mode(true)
        .executor(executor)
        .session_store(store)
        .build()
        .expect("valid test client")
}

/// Body of a successful token response
pub fn token_body(token: &str) -> String {
    format!(r#"{{"data":{{"access_token":"{token}"}}}}"#)
}

/// Body of a server error object
pub fn error_body(code: i64, message: &str) -> String {
    format!(r#"{{"error":{{"code":{code},"message":"{message}","type":"OAuthException"}}}}"#)
}
