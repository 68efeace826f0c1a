//! Response normalization
//!
//! Turns a raw body into a [`GraphResponse`]:
//!
//! 1. Decode as JSON; only objects and arrays count as a decoded structure
//! 2. Otherwise decode as a form-encoded body (bracket keys become nesting)
//! 3. Neither works: `GraphError::Parse`
//!
//! A structure with a non-null `error` key is a failure. Anything else is a
//! success whose `data` is the `data` field when present, else the whole
//! structure.

use goplay_domain::utils::form;
use goplay_domain::{
    GraphError, GraphFailure, GraphRequest, GraphResponse, GraphSuccess, Result,
};
use serde_json::{Map, Value};

const BODY_PREVIEW_CHARS: usize = 64;

/// Stateless response parser
pub struct ResponseParser;

impl ResponseParser {
    /// Parse `raw` as the response to `request`.
    ///
    /// # Errors
    /// Returns `GraphError::Parse` when the body is neither a JSON structure
    /// nor a well-formed form-encoded body.
    pub fn parse(raw: &str, request: &GraphRequest) -> Result<GraphResponse> {
        let decoded = Self::decode(raw).ok_or_else(|| GraphError::Parse {
            message: format!(
                "body is neither JSON nor form-encoded: {:?}",
                raw.chars().take(BODY_PREVIEW_CHARS).collect::<String>()
            ),
            url: request.redacted_url(),
        })?;

        Ok(Self::normalize(decoded, &request.effective_url()))
    }

    fn decode(raw: &str) -> Option<Value> {
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
            _ => form::decode_structure(raw).map(|params| params.to_json()),
        }
    }

    fn normalize(decoded: Value, url: &str) -> GraphResponse {
        match decoded {
            Value::Object(fields) => Self::normalize_object(fields, url),
            other => GraphResponse::Success(GraphSuccess::new(other.clone(), None, None, other)),
        }
    }

    fn normalize_object(fields: Map<String, Value>, url: &str) -> GraphResponse {
        if let Some(error) = present(&fields, "error") {
            return GraphResponse::Failure(Self::failure(error, &fields, url));
        }

        let data = present(&fields, "data").cloned();
        let paging = present(&fields, "paging").cloned();
        let metadata = present(&fields, "metadata").cloned();
        let raw = Value::Object(fields);
        let data = data.unwrap_or_else(|| raw.clone());
        GraphResponse::Success(GraphSuccess::new(data, paging, metadata, raw))
    }

    fn failure(error: &Value, fields: &Map<String, Value>, url: &str) -> GraphFailure {
        match error {
            Value::Object(details) => GraphFailure {
                code: details.get("code").and_then(as_code).unwrap_or_default(),
                message: details.get("message").map(as_text).unwrap_or_default(),
                error_type: details.get("type").and_then(Value::as_str).map(str::to_string),
                url: url.to_string(),
            },
            // OAuth-style `error=invalid_client&error_description=...`
            Value::String(kind) => GraphFailure {
                code: fields.get("code").and_then(as_code).unwrap_or_default(),
                message: fields
                    .get("error_description")
                    .and_then(Value::as_str)
                    .unwrap_or(kind)
                    .to_string(),
                error_type: Some(kind.clone()),
                url: url.to_string(),
            },
            other => GraphFailure {
                code: 0,
                message: other.to_string(),
                error_type: None,
                url: url.to_string(),
            },
        }
    }
}

fn present<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|value| !value.is_null())
}

fn as_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
