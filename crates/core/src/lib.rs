//! # GoPlay Core
//!
//! Graph client logic - no transport or storage backends.
//!
//! This crate contains:
//! - Port interfaces for the transport and the session store
//! - Endpoint path accumulation and response normalization
//! - Token lifecycle management
//! - The graph client and its expired-token retry policy
//!
//! ## Architecture Principles
//! - Only depends on `goplay-domain`
//! - No HTTP or storage code
//! - All external dependencies via traits

pub mod auth;
pub mod graph;

// Re-export commonly used items
pub use auth::{InMemorySessionStore, SessionStore, TokenManager};
pub use graph::{
    CancellableExecutor, EndpointBuilder, GraphClient, GraphClientBuilder, RequestExecutor,
    ResponseParser,
};
