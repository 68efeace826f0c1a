//! Request descriptors

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{PARAM_ACCESS_TOKEN, PARAM_CLIENT_SECRET, PARAM_METHOD, REDACTED};
use crate::types::Params;
use crate::utils::form;
use crate::utils::path::{normalize_segment, split_paging_url};

/// Logical graph method, sent as the `method` form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One graph call: endpoint, parameters and logical method
///
/// Built once per dispatch. A token refresh produces a new descriptor via
/// [`GraphRequest::with_access_token`] rather than mutating the executed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphRequest {
    endpoint: String,
    url: String,
    params: Params,
    method: Method,
}

impl GraphRequest {
    /// Build a descriptor. `method` is merged into the params last,
    /// overriding any caller-supplied `method` key.
    pub fn new(base_url: &str, endpoint: &str, mut params: Params, method: Method) -> Self {
        let endpoint = normalize_segment(endpoint);
        let url = format!("{}{}", base_url.trim_end_matches('/'), endpoint);
        params.insert(PARAM_METHOD, method.as_str());
        Self { endpoint, url, params, method }
    }

    /// Build a GET descriptor from a server-supplied paging URL. The query
    /// string becomes the params; no access token is injected.
    pub fn from_paging_url(base_url: &str, paging_url: &str) -> Self {
        let (endpoint, query) = split_paging_url(paging_url);
        Self::new(base_url, endpoint, form::decode(query), Method::Get)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Base URL joined with the endpoint, without query string.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn access_token(&self) -> Option<&str> {
        self.params.text(PARAM_ACCESS_TOKEN)
    }

    /// URL-encoded request body.
    pub fn body(&self) -> String {
        form::encode(&self.params)
    }

    /// URL plus the encoded params as a query string; used in error reports.
    pub fn effective_url(&self) -> String {
        format!("{}?{}", self.url, self.body())
    }

    /// Effective URL with credentials replaced, for log output.
    pub fn redacted_url(&self) -> String {
        let mut params = self.params.clone();
        for key in [PARAM_ACCESS_TOKEN, PARAM_CLIENT_SECRET] {
            if params.contains_key(key) {
                params.insert(key, REDACTED);
            }
        }
        format!("{}?{}", self.url, form::encode(&params))
    }

    /// Copy of this descriptor carrying a different access token.
    #[must_use]
    pub fn with_access_token(&self, token: &str) -> Self {
        let mut next = self.clone();
        next.params.insert(PARAM_ACCESS_TOKEN, token);
        next
    }
}
