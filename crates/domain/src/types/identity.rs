//! Publisher credentials and per-identity token state

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::REDACTED;
use crate::errors::{GraphError, Result};

/// Publisher credentials used for the client-credentials grant
///
/// Immutable once built. The secret is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    publisher_id: String,
    secret: String,
}

impl ClientIdentity {
    /// Create an identity from a publisher id and secret.
    ///
    /// # Errors
    /// Returns `GraphError::Config` if either value is blank.
    pub fn new(publisher_id: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        let publisher_id = publisher_id.into();
        let secret = secret.into();

        if publisher_id.trim().is_empty() {
            return Err(GraphError::Config("publisher id must not be empty".to_string()));
        }
        if secret.trim().is_empty() {
            return Err(GraphError::Config("publisher secret must not be empty".to_string()));
        }

        Ok(Self { publisher_id, secret })
    }

    pub fn publisher_id(&self) -> &str {
        &self.publisher_id
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Stable session-store key for this identity.
    ///
    /// Hex-encoded SHA-256 of `<publisher_id>-<secret>`, so distinct
    /// credential pairs never share token state and the secret never appears
    /// in the key.
    pub fn session_key(&self) -> String {
        let digest = Sha256::digest(format!("{}-{}", self.publisher_id, self.secret).as_bytes());
        hex::encode(digest)
    }
}

impl fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("publisher_id", &self.publisher_id)
            .field("secret", &REDACTED)
            .finish()
    }
}

/// Cached token and consecutive auth-failure count for one identity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    pub token: Option<String>,
    pub failure_count: u32,
}

impl TokenState {
    /// Freshly acquired token with no recorded failures.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: Some(token.into()), failure_count: 0 }
    }
}
