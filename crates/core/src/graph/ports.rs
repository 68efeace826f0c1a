//! Port interfaces for the graph transport
//!
//! The HTTP transport is an adapter; core only sees raw response bodies.

use std::sync::Arc;

use async_trait::async_trait;
use goplay_domain::{GraphError, GraphRequest, Result};
use tokio_util::sync::CancellationToken;

/// Trait for issuing one graph call
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Send `request` and return the raw response body.
    ///
    /// Fails with `GraphError::Transport` when the call cannot complete.
    /// Server-reported errors are returned as bodies, not errors.
    async fn execute(&self, request: &GraphRequest) -> Result<String>;
}

/// Executor decorator that aborts in-flight calls when a token fires
pub struct CancellableExecutor {
    inner: Arc<dyn RequestExecutor>,
    cancellation: CancellationToken,
}

impl CancellableExecutor {
    pub fn new(inner: Arc<dyn RequestExecutor>, cancellation: CancellationToken) -> Self {
        Self { inner, cancellation }
    }
}

#[async_trait]
impl RequestExecutor for CancellableExecutor {
    async fn execute(&self, request: &GraphRequest) -> Result<String> {
        if self.cancellation.is_cancelled() {
            return Err(GraphError::Cancelled);
        }
        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => Err(GraphError::Cancelled),
            result = self.inner.execute(request) => result,
        }
    }
}
