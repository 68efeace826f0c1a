//! Token manager for the publisher-credentials grant
//!
//! Manages the access token lifecycle for one or more publisher identities:
//! - Cached token lookup in the session store
//! - Token acquisition from `oauth/access_token`
//! - Consecutive auth-failure counting per identity
//!
//! Token state lives only in the injected [`SessionStore`], keyed by
//! [`ClientIdentity::session_key`], so every client view built for the same
//! credentials shares it.

use std::sync::Arc;

use goplay_domain::constants::{
    GRANT_TYPE_PUBLISHER_CREDENTIALS, OAUTH_TOKEN_ENDPOINT, PARAM_ACCESS_TOKEN, PARAM_CLIENT_ID,
    PARAM_CLIENT_SECRET, PARAM_GRANT_TYPE,
};
use goplay_domain::{
    ApiError, ClientIdentity, GraphError, GraphRequest, Method, Params, Result, TokenState,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::ports::SessionStore;
use crate::graph::parser::ResponseParser;
use crate::graph::ports::RequestExecutor;

/// Token manager backed by a session store
///
/// Cheap to clone; clones share the store and executor.
#[derive(Clone)]
pub struct TokenManager {
    store: Arc<dyn SessionStore>,
    executor: Arc<dyn RequestExecutor>,
    base_url: String,
}

impl TokenManager {
    /// Create a new token manager
    ///
    /// # Arguments
    /// * `store` - Session store holding token state
    /// * `executor` - Transport used for the token request
    /// * `base_url` - Graph host the token endpoint lives on
    pub fn new(
        store: Arc<dyn SessionStore>,
        executor: Arc<dyn RequestExecutor>,
        base_url: impl Into<String>,
    ) -> Self {
        Self { store, executor, base_url: base_url.into() }
    }

    /// Get an access token for `identity`
    ///
    /// Returns the cached token when the store has one. Otherwise fetches a
    /// new token and caches it with a zero failure count.
    ///
    /// # Errors
    /// Returns error if the store fails or the token request fails
    pub async fn get_token(&self, identity: &ClientIdentity) -> Result<String> {
        let key = identity.session_key();
        if let Some(token) = self.load(&key).await?.token {
            debug!(publisher_id = identity.publisher_id(), "Using cached access token");
            return Ok(token);
        }

        let token = self.request_token(identity).await?;
        self.store.set(&key, TokenState::with_token(token.clone())).await?;
        Ok(token)
    }

    /// Fetch a new access token from the server and cache it
    ///
    /// The identity's failure count is left untouched so that a refresh
    /// in the middle of a retry sequence does not reset the retry bound.
    ///
    /// # Errors
    /// Returns `GraphError::Api` if the server answers with an error, or
    /// `GraphError::Parse` if the answer carries no `access_token`
    pub async fn fetch_from_server(&self, identity: &ClientIdentity) -> Result<String> {
        let token = self.request_token(identity).await?;

        let key = identity.session_key();
        let mut state = self.load(&key).await?;
        state.token = Some(token.clone());
        self.store.set(&key, state).await?;

        Ok(token)
    }

    /// Record one auth failure and return the new count
    ///
    /// Creates the state with a count of 1 when none exists.
    pub async fn record_failure(&self, identity: &ClientIdentity) -> Result<u32> {
        let key = identity.session_key();
        let mut state = self.load(&key).await?;
        state.failure_count = state.failure_count.saturating_add(1);
        let count = state.failure_count;
        self.store.set(&key, state).await?;

        warn!(publisher_id = identity.publisher_id(), failures = count, "Access token rejected");
        Ok(count)
    }

    /// Drop the cached token but keep the failure count
    ///
    /// Called once retries are exhausted so the next call goes through
    /// [`Self::get_token`] and starts over with a fresh token.
    pub async fn discard_token(&self, identity: &ClientIdentity) -> Result<()> {
        let key = identity.session_key();
        let mut state = self.load(&key).await?;
        if state.token.take().is_none() {
            return Ok(());
        }
        self.store.set(&key, state).await
    }

    /// Reset the failure count, keeping the cached token
    pub async fn clear_failures(&self, identity: &ClientIdentity) -> Result<()> {
        let key = identity.session_key();
        let mut state = self.load(&key).await?;
        if state.failure_count == 0 {
            return Ok(());
        }
        state.failure_count = 0;
        self.store.set(&key, state).await
    }

    /// Current consecutive failure count for `identity`
    pub async fn failure_count(&self, identity: &ClientIdentity) -> Result<u32> {
        Ok(self.load(&identity.session_key()).await?.failure_count)
    }

    async fn load(&self, key: &str) -> Result<TokenState> {
        Ok(self.store.get(key).await?.unwrap_or_default())
    }

    async fn request_token(&self, identity: &ClientIdentity) -> Result<String> {
        let params = Params::new()
            .with(PARAM_CLIENT_ID, identity.publisher_id())
            .with(PARAM_CLIENT_SECRET, identity.secret())
            .with(PARAM_GRANT_TYPE, GRANT_TYPE_PUBLISHER_CREDENTIALS);
        let request = GraphRequest::new(&self.base_url, OAUTH_TOKEN_ENDPOINT, params, Method::Get);

        debug!(url = %request.redacted_url(), "Requesting access token");

        let raw = self.executor.execute(&request).await?;
        let success = ResponseParser::parse(&raw, &request)?.into_result().map_err(|err| {
            // The effective URL carries the client secret.
            GraphError::Api(ApiError::new(
                err.server_message,
                err.code,
                err.error_type,
                request.redacted_url(),
            ))
        })?;

        let token = success
            .data()
            .get(PARAM_ACCESS_TOKEN)
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or_else(|| GraphError::Parse {
                message: "token response did not contain an access_token".to_string(),
                url: request.redacted_url(),
            })?;

        info!(publisher_id = identity.publisher_id(), "Access token acquired");
        Ok(token)
    }
}
