//! Gateway client error types.

use serde_json::Value;

/// A non-2xx response from the gateway.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} (HTTP {status})")]
pub struct ApiError {
    /// Human-readable message taken from the body, or the HTTP status text.
    pub message: String,
    pub status: u16,
    /// The parsed JSON body, when the body was JSON.
    pub details: Option<Value>,
}

impl ApiError {
    /// Build from a response status and raw body.
    ///
    /// The message is the body's `error` string, or `error.message` when
    /// `error` is an object, or a top-level `message` string. Otherwise it
    /// falls back to the status text.
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let details: Option<Value> = serde_json::from_str(body).ok();
        let message = details
            .as_ref()
            .and_then(message_from_body)
            .unwrap_or_else(|| status_text(status));
        Self {
            message,
            status: status.as_u16(),
            details,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

fn message_from_body(body: &Value) -> Option<String> {
    match body.get("error") {
        Some(Value::String(s)) => return Some(s.clone()),
        Some(Value::Object(obj)) => {
            if let Some(Value::String(s)) = obj.get("message") {
                return Some(s.clone());
            }
        }
        _ => {}
    }
    match body.get("message") {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

fn status_text(status: reqwest::StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

/// Errors from gateway calls.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Gateway returned a non-2xx status.
    #[error("gateway {endpoint} failed: {source}")]
    Api {
        endpoint: String,
        source: ApiError,
    },
    /// RPC answered 2xx with an `error` field in the body.
    #[error("RPC {endpoint} rejected: {message}")]
    Rpc { endpoint: String, message: String },
    /// Response body did not match the expected shape.
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl GatewayError {
    /// Whether the gateway answered 404. Lookups of optional entities map
    /// this to `Ok(None)`; callers must not retry it.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { source, .. } if source.is_not_found())
    }

    /// The underlying [`ApiError`], if the gateway answered non-2xx.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api { source, .. } => Some(source),
            _ => None,
        }
    }
}
