//! Process-local session store

use std::collections::HashMap;

use async_trait::async_trait;
use goplay_domain::{Result, TokenState};
use parking_lot::RwLock;

use super::ports::SessionStore;

/// In-memory [`SessionStore`] with no expiry
///
/// Default store for clients built without an explicit one. State lives as
/// long as the store does.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<String, TokenState>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<TokenState>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, state: TokenState) -> Result<()> {
        self.entries.write().insert(key.to_string(), state);
        Ok(())
    }
}
