//! Shared HTTP plumbing for every sub-client.
//!
//! Success bodies go through a fixed ladder:
//!
//! 1. status outside 2xx → [`GatewayError::Api`] carrying an [`ApiError`];
//! 2. `204 No Content` → `{}`;
//! 3. empty body → `{}`;
//! 4. JSON body → the parsed value;
//! 5. anything else → the raw text as a JSON string.
//!
//! Reads are resent when the gateway cannot be reached, after 200 ms, 400 ms
//! and 800 ms. Any HTTP response, error statuses included, ends the call.
//! Writes are sent once: a `setup-*` request that reached the connector
//! must not be replayed.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, GatewayError};

/// Pause before each resend of a read.
const RESEND_BACKOFF_MS: [u64; 3] = [200, 400, 800];

/// Whether a call may be re-sent after a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resend {
    OnTransportError,
    Never,
}

impl Resend {
    /// Read-only methods may be resent; everything else goes out once.
    pub(crate) fn for_method(method: &Method) -> Self {
        if *method == Method::GET {
            Self::OnTransportError
        } else {
            Self::Never
        }
    }

    fn backoff(self) -> &'static [u64] {
        match self {
            Self::OnTransportError => &RESEND_BACKOFF_MS,
            Self::Never => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    base: String,
}

impl Transport {
    pub(crate) fn new(http: reqwest::Client, base: String) -> Self {
        Self { http, base }
    }

    pub(crate) fn base(&self) -> &str {
        &self.base
    }

    /// Send a request and return the body per the success ladder.
    pub(crate) async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        resend: Resend,
    ) -> Result<Value, GatewayError> {
        let endpoint = format!("{method} {path}");
        let resp = self.send(&method, path, body, resend).await.map_err(|e| {
            GatewayError::Http {
                endpoint: endpoint.clone(),
                source: e,
            }
        })?;

        let status = resp.status();
        tracing::debug!(endpoint = %endpoint, status = status.as_u16(), "gateway response");

        if status == StatusCode::NO_CONTENT {
            return Ok(empty_object());
        }

        let text = resp.text().await.map_err(|e| GatewayError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        if !status.is_success() {
            return Err(GatewayError::Api {
                endpoint,
                source: ApiError::from_response(status, &text),
            });
        }

        Ok(parse_success_body(text))
    }

    /// Send until the gateway answers or the resend budget is spent.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: &Method,
        path: &str,
        body: Option<&B>,
        resend: Resend,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let url = format!("{}{}", self.base, path);
        let mut backoff = resend.backoff().iter();
        let mut attempt = 1u32;
        loop {
            let mut req = self.http.request(method.clone(), &url);
            if let Some(body) = body {
                req = req.json(body);
            }
            let err = match req.send().await {
                Ok(resp) => return Ok(resp),
                Err(e) => e,
            };
            let Some(&delay_ms) = backoff.next() else {
                return Err(err);
            };
            tracing::warn!(
                method = %method,
                path,
                attempt,
                delay_ms,
                error = %err,
                "gateway unreachable, resending read"
            );
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            attempt += 1;
        }
    }

    /// GET `path` and decode it as `T`.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let value = self
            .request::<Value>(Method::GET, path, None, Resend::OnTransportError)
            .await?;
        decode(path, value)
    }

    /// GET `path`, mapping a 404 to `None`.
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, GatewayError> {
        match self.get(path).await {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

fn parse_success_body(text: String) -> Value {
    if text.trim().is_empty() {
        return empty_object();
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

pub(crate) fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, GatewayError> {
    serde_json::from_value(value).map_err(|e| GatewayError::Decode {
        endpoint: format!("GET {path}"),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_reads_are_resent() {
        assert_eq!(Resend::for_method(&Method::GET), Resend::OnTransportError);
        for method in [Method::POST, Method::PUT, Method::DELETE] {
            assert_eq!(Resend::for_method(&method), Resend::Never);
            assert!(Resend::for_method(&method).backoff().is_empty());
        }
        assert_eq!(Resend::OnTransportError.backoff(), &[200, 400, 800]);
    }

    #[test]
    fn success_body_ladder() {
        assert_eq!(parse_success_body(String::new()), empty_object());
        assert_eq!(parse_success_body("  \n".into()), empty_object());
        assert_eq!(
            parse_success_body(r#"{"a":1}"#.into()),
            serde_json::json!({ "a": 1 })
        );
        assert_eq!(
            parse_success_body("accepted".into()),
            Value::String("accepted".into())
        );
    }
}
