//! Port interfaces for token-state persistence
//!
//! These traits define the boundary between token lifecycle logic and the
//! key-value store that carries token state across requests.

use async_trait::async_trait;
use goplay_domain::{Result, TokenState};

/// Key-value store for per-identity token state
///
/// Each call is expected to be atomic on its own. Callers do not hold locks
/// across a get/set pair. Backend failures are reported as
/// `GraphError::Session` and propagate out of the graph call unchanged.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the state stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<TokenState>>;

    /// Store `state` under `key`, replacing any previous value
    async fn set(&self, key: &str, state: TokenState) -> Result<()>;
}
