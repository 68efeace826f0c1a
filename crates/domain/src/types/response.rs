//! Normalized response envelopes

use serde_json::Value;

use crate::errors::ApiError;

/// Outcome of one graph call: exactly one of success or failure
#[derive(Debug, Clone, PartialEq)]
pub enum GraphResponse {
    Success(GraphSuccess),
    Failure(GraphFailure),
}

impl GraphResponse {
    /// Convert into a result, turning a failure into its `ApiError`.
    pub fn into_result(self) -> Result<GraphSuccess, ApiError> {
        match self {
            Self::Success(success) => Ok(success),
            Self::Failure(failure) => Err(failure.into_error()),
        }
    }
}

/// Successful response: `data`, optional `paging` and `metadata`
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSuccess {
    data: Value,
    paging: Option<Value>,
    metadata: Option<Value>,
    raw: Value,
}

impl GraphSuccess {
    pub fn new(data: Value, paging: Option<Value>, metadata: Option<Value>, raw: Value) -> Self {
        Self { data, paging, metadata, raw }
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// The decoded `paging` field, cursors included.
    pub fn paging(&self) -> Option<&Value> {
        self.paging.as_ref()
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }

    /// The whole decoded response body.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn next_url(&self) -> Option<&str> {
        self.link("next")
    }

    pub fn previous_url(&self) -> Option<&str> {
        self.link("previous")
    }

    fn link(&self, key: &str) -> Option<&str> {
        self.paging
            .as_ref()
            .and_then(|paging| paging.get(key))
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
    }
}

/// Server-reported failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphFailure {
    pub code: i64,
    pub message: String,
    pub error_type: Option<String>,
    /// Effective URL of the request that produced this failure
    pub url: String,
}

impl GraphFailure {
    pub fn into_error(self) -> ApiError {
        ApiError::new(self.message, self.code, self.error_type, self.url)
    }
}
