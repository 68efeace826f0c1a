//! Graph client with endpoint chaining and expired-token retry
//!
//! A [`GraphClient`] is a lightweight view: identity, configuration and the
//! session store are shared behind an `Arc`, while each view owns its own
//! [`EndpointBuilder`]. Views are created with [`GraphClient::resource`]
//! and consumed by the terminal calls (`get`, `post`, `delete`).

use std::fmt;
use std::sync::Arc;

use goplay_domain::constants::{
    PARAM_ACCESS_TOKEN, PRODUCTION_GRAPH_URL, PUBLISHER_ALIASES, TEST_GRAPH_URL,
};
use goplay_domain::{
    ApiError, ClientIdentity, GraphConfig, GraphError, GraphRequest, GraphSuccess, Method, Params,
    Result, RetryConfig,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::endpoint::EndpointBuilder;
use super::parser::ResponseParser;
use super::ports::{CancellableExecutor, RequestExecutor};
use crate::auth::{InMemorySessionStore, SessionStore, TokenManager};

/// State shared by every view derived from one client
struct ClientContext {
    identity: ClientIdentity,
    base_url: String,
    retry: RetryConfig,
    store: Arc<dyn SessionStore>,
}

/// Publisher graph client
///
/// Cloning, [`resource`](Self::resource) and
/// [`with_cancellation`](Self::with_cancellation) all produce views that
/// share token state through the session store.
#[derive(Clone)]
pub struct GraphClient {
    context: Arc<ClientContext>,
    executor: Arc<dyn RequestExecutor>,
    tokens: TokenManager,
    path: EndpointBuilder,
}

impl GraphClient {
    /// Create a builder for fluent configuration
    pub fn builder() -> GraphClientBuilder {
        GraphClientBuilder::default()
    }

    /// Create a client from a loaded configuration
    ///
    /// # Errors
    ///
    /// Returns `GraphError::Config` if the configuration is invalid
    pub fn from_config(
        config: &GraphConfig,
        executor: Arc<dyn RequestExecutor>,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(
            config.identity()?,
            config.base_url().to_string(),
            config.retry,
            executor,
            store,
        ))
    }

    fn assemble(
        identity: ClientIdentity,
        base_url: String,
        retry: RetryConfig,
        executor: Arc<dyn RequestExecutor>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        let tokens = TokenManager::new(store.clone(), executor.clone(), base_url.clone());
        let context = Arc::new(ClientContext { identity, base_url, retry, store });
        Self { context, executor, tokens, path: EndpointBuilder::new() }
    }

    /// New view with `name` appended to this view's path
    ///
    /// `pub` and `publisher` resolve to the configured publisher id.
    /// This view is left untouched.
    #[must_use]
    pub fn resource(&self, name: &str) -> Self {
        let mut view = self.clone();
        let segment = if PUBLISHER_ALIASES.contains(&name) {
            self.context.identity.publisher_id()
        } else {
            name
        };
        view.path.extend(segment);
        view
    }

    /// Shorthand for `resource("pub")`
    #[must_use]
    pub fn publisher(&self) -> Self {
        self.resource("pub")
    }

    /// Append a literal segment to this view's path in place
    pub fn extend(&mut self, segment: &str) -> &mut Self {
        self.path.extend(segment);
        self
    }

    /// Path accumulated by this view
    pub fn endpoint(&self) -> &str {
        self.path.current_path()
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.context.identity
    }

    pub fn base_url(&self) -> &str {
        &self.context.base_url
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.context.retry
    }

    /// View whose executor calls abort with `GraphError::Cancelled` once
    /// `cancellation` fires. Token fetches are covered as well.
    #[must_use]
    pub fn with_cancellation(&self, cancellation: CancellationToken) -> Self {
        let executor: Arc<dyn RequestExecutor> =
            Arc::new(CancellableExecutor::new(self.executor.clone(), cancellation));
        let tokens = TokenManager::new(
            self.context.store.clone(),
            executor.clone(),
            self.context.base_url.clone(),
        );
        Self { context: self.context.clone(), executor, tokens, path: self.path.clone() }
    }

    /// Current access token, fetching one when none is cached
    ///
    /// # Errors
    ///
    /// Returns error if the token request fails
    pub async fn token(&self) -> Result<String> {
        self.tokens.get_token(&self.context.identity).await
    }

    /// Consecutive expired-token failures recorded for this identity
    pub async fn failure_count(&self) -> Result<u32> {
        self.tokens.failure_count(&self.context.identity).await
    }

    /// Issue a `get` call against the accumulated path
    ///
    /// # Errors
    ///
    /// Returns `GraphError::Api` for server-reported failures,
    /// `GraphError::Transport` when the call cannot complete
    pub async fn get(&mut self, params: Params) -> Result<GraphSuccess> {
        self.call(Method::Get, params).await
    }

    /// Issue a `post` call against the accumulated path
    pub async fn post(&mut self, params: Params) -> Result<GraphSuccess> {
        self.call(Method::Post, params).await
    }

    /// Issue a `delete` call against the accumulated path
    pub async fn delete(&mut self, params: Params) -> Result<GraphSuccess> {
        self.call(Method::Delete, params).await
    }

    /// `get` with one trailing segment, e.g. an entry id
    pub async fn get_at(&mut self, segment: &str, params: Params) -> Result<GraphSuccess> {
        self.path.extend(segment);
        self.call(Method::Get, params).await
    }

    /// `post` with one trailing segment
    pub async fn post_at(&mut self, segment: &str, params: Params) -> Result<GraphSuccess> {
        self.path.extend(segment);
        self.call(Method::Post, params).await
    }

    /// `delete` with one trailing segment
    pub async fn delete_at(&mut self, segment: &str, params: Params) -> Result<GraphSuccess> {
        self.path.extend(segment);
        self.call(Method::Delete, params).await
    }

    /// Dispatch `method` against the accumulated path
    ///
    /// The path is reset whether the call succeeds, fails or is dropped.
    ///
    /// # Errors
    ///
    /// Returns the first terminal failure; expired-token failures are
    /// retried with a fresh token up to `retry.max_token_failures` times
    #[instrument(skip_all, fields(endpoint = %self.path.current_path(), method = %method))]
    pub async fn call(&mut self, method: Method, params: Params) -> Result<GraphSuccess> {
        let endpoint = self.path.current_path().to_string();
        self.path.reset();
        self.dispatch(&endpoint, method, params).await
    }

    async fn dispatch(&self, endpoint: &str, method: Method, params: Params) -> Result<GraphSuccess> {
        let identity = &self.context.identity;
        let retry = &self.context.retry;

        let token = self.tokens.get_token(identity).await?;
        let mut request = GraphRequest::new(
            &self.context.base_url,
            endpoint,
            params.with(PARAM_ACCESS_TOKEN, token),
            method,
        );

        loop {
            let error = match self.attempt(&request).await? {
                Ok(success) => {
                    self.tokens.clear_failures(identity).await?;
                    debug!(url = %request.redacted_url(), "Graph call succeeded");
                    return Ok(success);
                }
                Err(error) => error,
            };

            if !error.is_auth_failure(retry.auth_error_code) {
                self.tokens.clear_failures(identity).await?;
                return Err(error.into());
            }

            let failures = self.tokens.record_failure(identity).await?;
            if failures > retry.max_token_failures {
                warn!(
                    url = %request.redacted_url(),
                    failures,
                    "Expired-token retries exhausted"
                );
                self.tokens.discard_token(identity).await?;
                return Err(error.into());
            }

            let token = self.tokens.fetch_from_server(identity).await?;
            request = request.with_access_token(&token);
            debug!(url = %request.redacted_url(), attempt = failures + 1, "Retrying with fresh token");
        }
    }

    /// One execute-and-parse round trip. The outer `Result` carries
    /// transport and parse errors, the inner one the server's verdict.
    async fn attempt(
        &self,
        request: &GraphRequest,
    ) -> Result<std::result::Result<GraphSuccess, ApiError>> {
        debug!(url = %request.redacted_url(), "Dispatching graph call");
        let raw = self.executor.execute(request).await?;
        Ok(ResponseParser::parse(&raw, request)?.into_result())
    }

    /// Follow `paging.next` of a previous result
    ///
    /// The paging URL already embeds an access token, so none is injected
    /// and no expired-token retry happens. Returns `None` without a next
    /// link.
    pub async fn next(&self, page: &GraphSuccess) -> Result<Option<GraphSuccess>> {
        match page.next_url() {
            Some(url) => self.follow(url).await.map(Some),
            None => Ok(None),
        }
    }

    /// Follow `paging.previous` of a previous result
    pub async fn previous(&self, page: &GraphSuccess) -> Result<Option<GraphSuccess>> {
        match page.previous_url() {
            Some(url) => self.follow(url).await.map(Some),
            None => Ok(None),
        }
    }

    async fn follow(&self, paging_url: &str) -> Result<GraphSuccess> {
        let request = GraphRequest::from_paging_url(&self.context.base_url, paging_url);
        self.attempt(&request).await?.map_err(GraphError::from)
    }
}

impl fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphClient")
            .field("identity", &self.context.identity)
            .field("base_url", &self.context.base_url)
            .field("retry", &self.context.retry)
            .field("path", &self.path.current_path())
            .finish_non_exhaustive()
    }
}

/// Builder for [`GraphClient`]
#[derive(Default)]
pub struct GraphClientBuilder {
    publisher_id: Option<String>,
    secret: Option<String>,
    test_mode: bool,
    base_url: Option<String>,
    retry: RetryConfig,
    executor: Option<Arc<dyn RequestExecutor>>,
    store: Option<Arc<dyn SessionStore>>,
}

impl GraphClientBuilder {
    /// Set the publisher credentials
    pub fn credentials(mut self, publisher_id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.publisher_id = Some(publisher_id.into());
        self.secret = Some(secret.into());
        self
    }

    /// Target the test host instead of production
    pub fn test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Override the graph host (takes precedence over test mode)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn max_token_failures(mut self, max_token_failures: u32) -> Self {
        self.retry.max_token_failures = max_token_failures;
        self
    }

    pub fn auth_error_code(mut self, auth_error_code: i64) -> Self {
        self.retry.auth_error_code = auth_error_code;
        self
    }

    /// Set the transport
    pub fn executor(mut self, executor: Arc<dyn RequestExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Set the session store (defaults to [`InMemorySessionStore`])
    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the graph client
    ///
    /// # Errors
    ///
    /// Returns `GraphError::Config` if credentials or the executor are
    /// missing, or a credential is blank
    pub fn build(self) -> Result<GraphClient> {
        let (Some(publisher_id), Some(secret)) = (self.publisher_id, self.secret) else {
            return Err(GraphError::Config("Publisher credentials not set".to_string()));
        };
        let identity = ClientIdentity::new(publisher_id, secret)?;
        self.retry.validate()?;
        let executor =
            self.executor.ok_or_else(|| GraphError::Config("Request executor not set".to_string()))?;
        let store = self.store.unwrap_or_else(|| Arc::new(InMemorySessionStore::new()));

        let base_url = match (self.base_url, self.test_mode) {
            (Some(url), _) => url,
            (None, true) => TEST_GRAPH_URL.to_string(),
            (None, false) => PRODUCTION_GRAPH_URL.to_string(),
        };

        Ok(GraphClient::assemble(identity, base_url, self.retry, executor, store))
    }
}
