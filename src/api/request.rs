//! Request adapters for the two hosting runtimes.
//!
//! Handlers only ever look up headers and read the whole body; how the body
//! arrives is the adapter's business.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};
use std::sync::Mutex;

use crate::errors::HookError;

#[async_trait]
pub trait Request: Send + Sync {
    /// Case-insensitive header lookup.
    fn header(&self, name: &str) -> Option<&str>;

    /// Reads the full body as JSON. An empty body reads as `{}`.
    async fn body(&mut self) -> Result<Value, HookError>;
}

pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

/// Parses raw body bytes: empty is `{}`, otherwise UTF-8 JSON.
///
/// # Errors
///
/// Returns `HookError::Body` for invalid UTF-8 or malformed JSON.
pub fn parse_body(raw: &[u8]) -> Result<Value, HookError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| HookError::Body(format!("body is not valid UTF-8: {e}")))?;
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    Ok(serde_json::from_str(text)?)
}

fn event_body_bytes(payload: &Value) -> Result<Vec<u8>, HookError> {
    let Some(body) = payload.get("body").and_then(Value::as_str) else {
        return Ok(Vec::new());
    };

    if payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false)
    {
        BASE64
            .decode(body)
            .map_err(|e| HookError::Body(format!("invalid base64 body: {e}")))
    } else {
        Ok(body.as_bytes().to_vec())
    }
}

/// Standard runtime: headers and body are part of the proxy event.
#[derive(Debug, Clone)]
pub struct LambdaRequest {
    headers: Value,
    body: Value,
    base64: bool,
}

impl LambdaRequest {
    /// Request whose body has already been parsed.
    #[must_use]
    pub fn new(headers: Value, body: Value) -> Self {
        Self {
            headers,
            body,
            base64: false,
        }
    }

    /// Builds the request from an API Gateway proxy event.
    #[must_use]
    pub fn from_event(payload: &Value) -> Self {
        Self {
            headers: payload
                .get("headers")
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new())),
            body: payload.get("body").cloned().unwrap_or(Value::Null),
            base64: payload
                .get("isBase64Encoded")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }
}

#[async_trait]
impl Request for LambdaRequest {
    fn header(&self, name: &str) -> Option<&str> {
        get_header_value(&self.headers, name)
    }

    async fn body(&mut self) -> Result<Value, HookError> {
        match &self.body {
            Value::Null => Ok(Value::Object(Map::new())),
            Value::String(raw) if self.base64 => {
                let decoded = BASE64
                    .decode(raw)
                    .map_err(|e| HookError::Body(format!("invalid base64 body: {e}")))?;
                parse_body(&decoded)
            }
            Value::String(raw) => parse_body(raw.as_bytes()),
            parsed => Ok(parsed.clone()),
        }
    }
}

pub type BodyStream = BoxStream<'static, Result<Bytes, HookError>>;

/// Edge runtime: the body is a byte stream read at most once.
pub struct EdgeRequest {
    headers: HeaderMap,
    // Mutex only makes the request `Sync`; the stream is never shared.
    stream: Mutex<Option<BodyStream>>,
}

impl EdgeRequest {
    pub fn new<S>(headers: HeaderMap, stream: S) -> Self
    where
        S: futures::Stream<Item = Result<Bytes, HookError>> + Send + 'static,
    {
        Self {
            headers,
            stream: Mutex::new(Some(stream.boxed())),
        }
    }

    /// Builds the request from an API Gateway proxy event, exposing the
    /// event body as a single-chunk stream.
    #[must_use]
    pub fn from_event(payload: &Value) -> Self {
        let mut headers = HeaderMap::new();
        if let Some(map) = payload.get("headers").and_then(Value::as_object) {
            for (name, value) in map {
                let (Ok(name), Some(Ok(value))) = (
                    HeaderName::from_bytes(name.as_bytes()),
                    value.as_str().map(HeaderValue::from_str),
                ) else {
                    continue;
                };
                headers.insert(name, value);
            }
        }

        let chunk = event_body_bytes(payload).map(Bytes::from);
        Self::new(headers, stream::iter(vec![chunk]))
    }
}

#[async_trait]
impl Request for EdgeRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    async fn body(&mut self) -> Result<Value, HookError> {
        let mut stream = self
            .stream
            .get_mut()
            .map_err(|_| HookError::Body("body stream lock poisoned".to_string()))?
            .take()
            .ok_or_else(|| HookError::Body("body already consumed".to_string()))?;

        let mut buf = Vec::new();
        while let Some(chunk) = stream.next().await {
            buf.extend_from_slice(&chunk?);
        }
        parse_body(&buf)
    }
}
