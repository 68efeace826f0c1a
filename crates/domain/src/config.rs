//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    default_user_agent, CONNECT_TIMEOUT_SECS, DEFAULT_MAX_TOKEN_FAILURES,
    DEFAULT_SESSION_MAX_CAPACITY, DEFAULT_SESSION_TTL_SECS, EXPIRED_TOKEN_ERROR_CODE,
    PRODUCTION_GRAPH_URL, REQUEST_TIMEOUT_SECS, TEST_GRAPH_URL,
};
use crate::errors::{GraphError, Result};
use crate::types::ClientIdentity;

/// SDK configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    pub publisher_id: String,
    #[serde(skip_serializing, default)]
    pub secret: String,
    /// Talk to the test graph instead of production
    #[serde(default)]
    pub test_mode: bool,
    /// Explicit base URL; wins over `test_mode` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Expired-token retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Auth failures tolerated before the error is surfaced
    pub max_token_failures: u32,
    /// Server error code that marks an expired or invalid token
    pub auth_error_code: i64,
}

/// Transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Token-state store settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub ttl_seconds: u64,
    pub max_capacity: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_token_failures: DEFAULT_MAX_TOKEN_FAILURES,
            auth_error_code: EXPIRED_TOKEN_ERROR_CODE,
        }
    }
}

impl RetryConfig {
    /// Reject thresholds the failure counter cannot exceed
    ///
    /// # Errors
    /// Returns `GraphError::Config` when `max_token_failures` is `u32::MAX`
    pub fn validate(&self) -> Result<()> {
        if self.max_token_failures == u32::MAX {
            return Err(GraphError::Config(format!(
                "max_token_failures must be below {}",
                u32::MAX
            )));
        }
        Ok(())
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn user_agent(&self) -> String {
        self.user_agent.clone().unwrap_or_else(default_user_agent)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { ttl_seconds: DEFAULT_SESSION_TTL_SECS, max_capacity: DEFAULT_SESSION_MAX_CAPACITY }
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl GraphConfig {
    pub fn new(publisher_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            publisher_id: publisher_id.into(),
            secret: secret.into(),
            test_mode: false,
            base_url: None,
            retry: RetryConfig::default(),
            http: HttpConfig::default(),
            session: SessionConfig::default(),
        }
    }

    #[must_use]
    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Graph host requests are sent to.
    pub fn base_url(&self) -> &str {
        match (&self.base_url, self.test_mode) {
            (Some(url), _) => url,
            (None, true) => TEST_GRAPH_URL,
            (None, false) => PRODUCTION_GRAPH_URL,
        }
    }

    /// Credentials as a validated identity.
    ///
    /// # Errors
    /// Returns `GraphError::Config` when either credential is blank.
    pub fn identity(&self) -> Result<ClientIdentity> {
        ClientIdentity::new(self.publisher_id.clone(), self.secret.clone())
    }

    /// Check the configuration before a client is built.
    ///
    /// # Errors
    /// Returns `GraphError::Config` for blank credentials or zero timeouts.
    pub fn validate(&self) -> Result<()> {
        self.identity()?;
        self.retry.validate()?;
        if self.http.connect_timeout_secs == 0 || self.http.request_timeout_secs == 0 {
            return Err(GraphError::Config("HTTP timeouts must be greater than zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_wire_constants() {
        let config = GraphConfig::new("pub", "secret");

        assert_eq!(config.retry.max_token_failures, 2);
        assert_eq!(config.retry.auth_error_code, 190);
        assert_eq!(config.http.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.http.request_timeout(), Duration::from_secs(60));
        assert!(config.http.user_agent().starts_with("goplay-rust-"));
        assert_eq!(config.base_url(), PRODUCTION_GRAPH_URL);
    }

    #[test]
    fn base_url_follows_test_mode_and_override() {
        let config = GraphConfig::new("pub", "secret").with_test_mode(true);
        assert_eq!(config.base_url(), TEST_GRAPH_URL);

        let config = config.with_base_url("http://127.0.0.1:9999");
        assert_eq!(config.base_url(), "http://127.0.0.1:9999");
    }

    #[test]
    fn validate_rejects_blank_secret_and_zero_timeout() {
        assert!(GraphConfig::new("pub", "").validate().is_err());

        let mut config = GraphConfig::new("pub", "secret");
        config.http.request_timeout_secs = 0;
        assert!(matches!(config.validate(), Err(GraphError::Config(_))));
    }

    #[test]
    fn validate_rejects_unbounded_retry_threshold() {
        let mut config = GraphConfig::new("pub", "secret");
        config.retry.max_token_failures = u32::MAX - 1;
        assert!(config.validate().is_ok());

        config.retry.max_token_failures = u32::MAX;
        assert!(matches!(config.validate(), Err(GraphError::Config(_))));
    }

    #[test]
    fn secret_is_never_serialized() {
        let config = GraphConfig::new("pub", "s3cr3t");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("s3cr3t"));
    }
}
