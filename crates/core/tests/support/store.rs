//! Observable session store

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use goplay_core::{InMemorySessionStore, SessionStore};
use goplay_domain::{ClientIdentity, GraphError, Result, TokenState};

/// [`InMemorySessionStore`] that counts reads and writes.
#[derive(Default)]
pub struct CountingSessionStore {
    inner: InMemorySessionStore,
    gets: AtomicUsize,
    sets: AtomicUsize,
}

impl CountingSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a cached token for `identity`.
    pub async fn seeded(identity: &ClientIdentity, token: &str) -> Self {
        let store = Self::new();
        store.inner.set(&identity.session_key(), TokenState::with_token(token)).await.unwrap();
        store
    }

    pub async fn state(&self, identity: &ClientIdentity) -> Option<TokenState> {
        self.inner.get(&identity.session_key()).await.unwrap()
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for CountingSessionStore {
    async fn get(&self, key: &str) -> Result<Option<TokenState>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, state: TokenState) -> Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, state).await
    }
}

/// Store whose backend is unreachable.
pub struct UnavailableSessionStore;

#[async_trait]
impl SessionStore for UnavailableSessionStore {
    async fn get(&self, _key: &str) -> Result<Option<TokenState>> {
        Err(GraphError::Session("backend unavailable".to_string()))
    }

    async fn set(&self, _key: &str, _state: TokenState) -> Result<()> {
        Err(GraphError::Session("backend unavailable".to_string()))
    }
}
