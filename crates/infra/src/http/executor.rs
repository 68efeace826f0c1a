//! reqwest-backed [`RequestExecutor`]
//!
//! Every call is a `POST` with an `application/x-www-form-urlencoded` body;
//! the logical method travels in the `method` form field. Bodies are read
//! regardless of HTTP status because the graph reports failures inside the
//! body.

use std::time::Duration;

use async_trait::async_trait;
use goplay_core::RequestExecutor;
use goplay_domain::constants::default_user_agent;
use goplay_domain::{GraphError, GraphRequest, HttpConfig, Result};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client as ReqwestClient;
use tracing::debug;

use crate::errors::IntoGraphError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP transport for graph calls
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: ReqwestClient,
}

impl HttpExecutor {
    /// Start building a new executor.
    pub fn builder() -> HttpExecutorBuilder {
        HttpExecutorBuilder::default()
    }

    /// Executor with the default timeouts and user agent.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Executor configured from [`HttpConfig`].
    pub fn from_config(config: &HttpConfig) -> Result<Self> {
        Self::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .user_agent(config.user_agent())
            .build()
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, request: &GraphRequest) -> Result<String> {
        debug!(url = %request.redacted_url(), "sending graph request");

        let response = self
            .client
            .post(request.url())
            .header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
            .body(request.body())
            .send()
            .await
            .map_err(|err| err.into_graph_error(&request.effective_url()))?;

        let status = response.status();
        debug!(url = %request.redacted_url(), %status, "received graph response");

        response.text().await.map_err(|err| err.into_graph_error(&request.effective_url()))
    }
}

/// Builder for [`HttpExecutor`].
#[derive(Debug)]
pub struct HttpExecutorBuilder {
    connect_timeout: Duration,
    timeout: Duration,
    user_agent: String,
}

impl Default for HttpExecutorBuilder {
    fn default() -> Self {
        let defaults = HttpConfig::default();
        Self {
            connect_timeout: defaults.connect_timeout(),
            timeout: defaults.request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpExecutorBuilder {
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Total time allowed for one call, body included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn build(self) -> Result<HttpExecutor> {
        let client = ReqwestClient::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()
            .map_err(|err| GraphError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(HttpExecutor { client })
    }
}

#[cfg(test)]
mod tests {
    use goplay_domain::{Method, Params, TransportErrorKind};
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn request(base_url: &str, method: Method) -> GraphRequest {
        GraphRequest::new(
            base_url,
            "/1234/players",
            Params::new().with("access_token", "T1"),
            method,
        )
    }

    #[tokio::test]
    async fn posts_form_body_for_every_method() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/1234/players"))
            .and(header("content-type", FORM_CONTENT_TYPE))
            .and(body_string("access_token=T1&method=delete"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":true}"#))
            .expect(1)
            .mount(&server)
            .await;

        let executor = HttpExecutor::new().unwrap();
        let body = executor.execute(&request(&server.uri(), Method::Delete)).await.unwrap();

        assert_eq!(body, r#"{"data":true}"#);
    }

    #[tokio::test]
    async fn error_statuses_still_return_the_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string(r#"{"error":{"code":190,"message":"bad token"}}"#),
            )
            .mount(&server)
            .await;

        let executor = HttpExecutor::new().unwrap();
        let body = executor.execute(&request(&server.uri(), Method::Get)).await.unwrap();

        assert!(body.contains("190"));
    }

    #[tokio::test]
    async fn sends_configured_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("user-agent", default_user_agent().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let executor = HttpExecutor::from_config(&HttpConfig::default()).unwrap();
        executor.execute(&request(&server.uri(), Method::Get)).await.unwrap();
    }

    #[tokio::test]
    async fn timeout_reports_effective_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let executor = HttpExecutor::builder().timeout(Duration::from_millis(50)).build().unwrap();
        let request = request(&server.uri(), Method::Get);
        let err = executor.execute(&request).await.unwrap_err();

        match err {
            GraphError::Transport { kind, url, .. } => {
                assert_eq!(kind, TransportErrorKind::Timeout);
                assert_eq!(url, request.effective_url());
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
