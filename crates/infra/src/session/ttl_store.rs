//! Token-state store with expiry, backed by moka
//!
//! Entries expire `ttl` after their last write, which ends a token state's
//! lifecycle the way a server-side session would.

use async_trait::async_trait;
use goplay_core::SessionStore;
use goplay_domain::{Result, SessionConfig, TokenState};
use moka::sync::Cache;

/// In-memory [`SessionStore`] with time-to-live and bounded capacity
#[derive(Clone)]
pub struct TtlSessionStore {
    entries: Cache<String, TokenState>,
}

impl TtlSessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        log_config(config);
        let entries =
            Cache::builder().time_to_live(config.ttl()).max_capacity(config.max_capacity).build();
        Self { entries }
    }

    /// Drop the state for `key`, forcing a fresh token on next use.
    pub fn invalidate(&self, key: &str) {
        self.entries.invalidate(key);
    }

    pub fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }
}

impl Default for TtlSessionStore {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

#[async_trait]
impl SessionStore for TtlSessionStore {
    async fn get(&self, key: &str) -> Result<Option<TokenState>> {
        let state = self.entries.get(key);
        tracing::trace!(hit = state.is_some(), "session store lookup");
        Ok(state)
    }

    async fn set(&self, key: &str, state: TokenState) -> Result<()> {
        self.entries.insert(key.to_string(), state);
        Ok(())
    }
}

fn log_config(config: &SessionConfig) {
    tracing::info!(
        ttl_seconds = config.ttl_seconds,
        max_capacity = config.max_capacity,
        "Session store configuration loaded"
    );
}
