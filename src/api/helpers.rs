//! Response emission and shared response builders.

use serde_json::{Value, json};
use tracing::warn;

use crate::errors::HookError;

/// The emission function handlers pass their result through.
pub trait Respond: Send + Sync {
    fn json(&self, body: Value) -> Value;
}

/// Emits the body unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Respond for Passthrough {
    fn json(&self, body: Value) -> Value {
        body
    }
}

/// Wraps the body into an API Gateway proxy response.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProxyResponse;

impl Respond for ProxyResponse {
    fn json(&self, body: Value) -> Value {
        json_response(200, &body)
    }
}

impl<F> Respond for F
where
    F: Fn(Value) -> Value + Send + Sync,
{
    fn json(&self, body: Value) -> Value {
        self(body)
    }
}

// ============================================================================
// Response Builders
// ============================================================================

/// Returns a proxy response with a JSON body.
#[must_use]
pub fn json_response(status_code: u16, body: &Value) -> Value {
    json!({
        "statusCode": status_code,
        "headers": { "Content-Type": "application/json" },
        "body": body.to_string()
    })
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json_response(status_code, &json!({ "error": message }))
}

/// Body emitted when a delivery carries no update.
#[must_use]
pub fn status_false() -> Value {
    json!({ "status": false })
}

/// Emits `error` as the response body when `handle_errors` is set,
/// otherwise hands it back to the caller.
///
/// # Errors
///
/// Returns `error` unchanged when `handle_errors` is false.
pub fn catch_error<O>(error: HookError, handle_errors: bool, respond: &O) -> Result<Value, HookError>
where
    O: Respond + ?Sized,
{
    if handle_errors {
        warn!("Handler error emitted as response: {}", error);
        Ok(respond.json(error.to_response()))
    } else {
        Err(error)
    }
}
