//! Error types used throughout the SDK

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::ERROR_MESSAGE_PREFIX;

/// Main error type for graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// The transport could not complete the call (DNS, timeout, refused
    /// connection, TLS trust failure).
    #[error("Transport error ({kind}) for {url}: {message}")]
    Transport { kind: TransportErrorKind, message: String, url: String },

    /// The graph answered with an `error` object.
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The response body was neither JSON nor a form-encoded structure.
    #[error("Failed to parse response from {url}: {message}")]
    Parse { message: String, url: String },

    #[error("Session store error: {0}")]
    Session(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl GraphError {
    /// Returns the API error when this is a server-reported failure.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Numeric code of the failure: the server code for API errors, the
    /// transport code for transport errors.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Api(err) => Some(err.code),
            Self::Transport { kind, .. } => Some(kind.code()),
            _ => None,
        }
    }
}

/// Classification of transport failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Request,
    Body,
    Other,
}

impl TransportErrorKind {
    /// Stable numeric code reported as the transport error code.
    pub fn code(self) -> i64 {
        match self {
            Self::Connect => 7,
            Self::Timeout => 28,
            Self::Request => 55,
            Self::Body => 56,
            Self::Other => 1,
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Connect => write!(f, "connect"),
            Self::Request => write!(f, "request"),
            Self::Body => write!(f, "body"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured failure reported by the graph
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    /// Display message: `Error in request to <url>: <server message>`
    pub message: String,
    /// Message exactly as the server sent it
    pub server_message: String,
    pub code: i64,
    /// Optional `type` field of the server error object
    pub error_type: Option<String>,
    /// Effective URL of the failed request
    pub url: String,
}

impl ApiError {
    pub fn new(
        server_message: impl Into<String>,
        code: i64,
        error_type: Option<String>,
        url: impl Into<String>,
    ) -> Self {
        let server_message = server_message.into();
        let url = url.into();
        Self {
            message: format!("{ERROR_MESSAGE_PREFIX}{url}: {server_message}"),
            server_message,
            code,
            error_type,
            url,
        }
    }

    /// Whether this failure carries the given expired-token code.
    pub fn is_auth_failure(&self, auth_error_code: i64) -> bool {
        self.code == auth_error_code
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_message_is_prefixed_with_url() {
        let err = ApiError::new("bad token", 190, None, "https://graph.goplay.com/p?x=1");

        assert_eq!(err.message, "Error in request to https://graph.goplay.com/p?x=1: bad token");
        assert_eq!(err.server_message, "bad token");
        assert_eq!(err.to_string(), err.message);
        assert!(err.is_auth_failure(190));
        assert!(!err.is_auth_failure(100));
    }

    #[test]
    fn graph_error_exposes_codes() {
        let api: GraphError = ApiError::new("nope", 100, Some("OAuthException".into()), "u").into();
        assert_eq!(api.code(), Some(100));
        assert!(api.as_api().is_some());

        let transport = GraphError::Transport {
            kind: TransportErrorKind::Timeout,
            message: "timed out".into(),
            url: "u".into(),
        };
        assert_eq!(transport.code(), Some(28));
        assert!(transport.as_api().is_none());
        assert_eq!(GraphError::Cancelled.code(), None);
    }
}
