//! SDK constants
//!
//! Centralized location for the wire-level constants of the GoPlay graph API.

// Hosts
pub const PRODUCTION_GRAPH_URL: &str = "https://graph.goplay.com";
pub const TEST_GRAPH_URL: &str = "https://test-graph.goplay.com";

// OAuth client-credentials grant
pub const OAUTH_TOKEN_ENDPOINT: &str = "oauth/access_token";
pub const GRANT_TYPE_PUBLISHER_CREDENTIALS: &str = "publisher_credentials";
pub const PARAM_CLIENT_ID: &str = "client_id";
pub const PARAM_CLIENT_SECRET: &str = "client_secret";
pub const PARAM_GRANT_TYPE: &str = "grant_type";

// Parameters injected into every graph request
pub const PARAM_ACCESS_TOKEN: &str = "access_token";
pub const PARAM_METHOD: &str = "method";

/// Error code the graph returns for an expired or invalid access token.
pub const EXPIRED_TOKEN_ERROR_CODE: i64 = 190;

/// Auth failures tolerated per identity before the error is surfaced.
pub const DEFAULT_MAX_TOKEN_FAILURES: u32 = 2;

// Transport
pub const CONNECT_TIMEOUT_SECS: u64 = 10;
pub const REQUEST_TIMEOUT_SECS: u64 = 60;
pub const USER_AGENT_PREFIX: &str = "goplay-rust-";

// Session store
pub const DEFAULT_SESSION_TTL_SECS: u64 = 1440;
pub const DEFAULT_SESSION_MAX_CAPACITY: u64 = 10_000;

/// Deepest bracket nesting accepted when decoding form bodies; deeper
/// pairs are dropped.
pub const MAX_FORM_NESTING: usize = 64;

/// Segment names that resolve to the configured publisher id.
pub const PUBLISHER_ALIASES: [&str; 2] = ["pub", "publisher"];

/// Prefix of every API error message, followed by the effective URL.
pub const ERROR_MESSAGE_PREFIX: &str = "Error in request to ";

/// Placeholder written over secrets in log output.
pub const REDACTED: &str = "[REDACTED]";

/// Version reported in the default user agent.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default `User-Agent` header value.
pub fn default_user_agent() -> String {
    format!("{USER_AGENT_PREFIX}{SDK_VERSION}")
}
