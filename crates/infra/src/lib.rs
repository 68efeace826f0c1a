//! # GoPlay Infrastructure
//!
//! Infrastructure implementations of `goplay-core` ports.
//!
//! This crate contains:
//! - The reqwest-backed HTTP executor
//! - A TTL session store backed by moka
//! - Configuration loading from environment and files
//! - [`connect`], which wires a ready [`GraphClient`] from a config
//!
//! ## Architecture
//! - Implements traits defined in `goplay-core`
//! - Contains all "impure" code (network, filesystem, clocks)

pub mod config;
pub mod errors;
pub mod http;
pub mod session;

use std::sync::Arc;

use goplay_core::GraphClient;
use goplay_domain::{GraphConfig, Result};

// Re-export commonly used items
pub use http::{HttpExecutor, HttpExecutorBuilder};
pub use session::TtlSessionStore;

/// Build a [`GraphClient`] with the HTTP executor and a TTL session store
///
/// # Errors
///
/// Returns `GraphError::Config` if the configuration is invalid or the HTTP
/// client cannot be built
pub fn connect(config: &GraphConfig) -> Result<GraphClient> {
    config.validate()?;
    let executor = HttpExecutor::from_config(&config.http)?;
    let store = TtlSessionStore::new(&config.session);

    tracing::info!(
        base_url = config.base_url(),
        publisher_id = %config.publisher_id,
        "Graph client configured"
    );
    GraphClient::from_config(config, Arc::new(executor), Arc::new(store))
}
